use std::path::PathBuf;

use stockqr_core::qr_codec::{DEFAULT_QR_SIZE, MAX_QR_SIZE};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory QR PNGs are written to on download and read from on upload.
    pub qr_codes_dir: PathBuf,
    /// Edge length of generated QR images in pixels (default: `300`,
    /// at most [`MAX_QR_SIZE`]).
    pub qr_code_size: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `QR_CODES_DIR`         | `$HOME/Desktop/Codes`      |
    /// | `QR_CODE_SIZE`         | `300` (at most 4096)       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let qr_codes_dir = std::env::var("QR_CODES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_qr_codes_dir());

        let qr_code_size: u32 = std::env::var("QR_CODE_SIZE")
            .map(|s| parse_qr_code_size(&s).unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or(DEFAULT_QR_SIZE);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            qr_codes_dir,
            qr_code_size,
        }
    }
}

/// Parse `QR_CODE_SIZE`: a pixel count between 1 and [`MAX_QR_SIZE`].
fn parse_qr_code_size(raw: &str) -> Result<u32, String> {
    let size: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("QR_CODE_SIZE must be a valid u32, got '{raw}'"))?;
    if size == 0 || size > MAX_QR_SIZE {
        return Err(format!(
            "QR_CODE_SIZE must be between 1 and {MAX_QR_SIZE}, got {size}"
        ));
    }
    Ok(size)
}

/// `$HOME/Desktop/Codes`, or `./Codes` when `HOME` is unset.
fn default_qr_codes_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("Desktop").join("Codes"),
        None => PathBuf::from("Codes"),
    }
}
