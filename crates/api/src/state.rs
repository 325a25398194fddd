use std::sync::Arc;

use stockqr_core::interchange::QrCodeDir;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockqr_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Interchange directory for QR code downloads and uploads.
    pub qr_dir: Arc<QrCodeDir>,
}

impl AppState {
    pub fn new(pool: stockqr_db::DbPool, config: ServerConfig) -> Self {
        let qr_dir = Arc::new(QrCodeDir::new(config.qr_codes_dir.clone()));
        Self {
            pool,
            config: Arc::new(config),
            qr_dir,
        }
    }
}
