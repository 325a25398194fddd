//! Local directory where QR code PNGs are exchanged with operators.
//!
//! Downloads mirror the image into the directory as `QR_Code_<id>.png`;
//! uploads name a file that must already be there. Only bare file names are
//! accepted, so a request can never reach outside the directory.

use std::io;
use std::path::{Path, PathBuf};

use crate::types::DbId;

const QR_FILE_PREFIX: &str = "QR_Code_";
const PNG_EXTENSION: &str = "png";

#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),

    #[error("File '{0}' not found in the QR code directory")]
    NotFound(String),

    #[error("QR code directory I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Deterministic file name of an article's QR image.
pub fn qr_file_name(id: DbId) -> String {
    format!("{QR_FILE_PREFIX}{id}.{PNG_EXTENSION}")
}

/// Handle on the interchange directory. The directory is created lazily on
/// first write.
#[derive(Debug, Clone)]
pub struct QrCodeDir {
    root: PathBuf,
}

impl QrCodeDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an article's QR image, creating the directory if needed.
    /// Overwrites any previous file for the same id.
    pub async fn write_qr(&self, id: DbId, png: &[u8]) -> Result<PathBuf, InterchangeError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(qr_file_name(id));
        tokio::fs::write(&path, png).await?;
        Ok(path)
    }

    /// Read a file by bare name.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, InterchangeError> {
        let path = self.root.join(validate_file_name(file_name)?);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(InterchangeError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Names of the PNG files currently in the directory, sorted. A missing
    /// directory lists as empty.
    pub async fn list_png(&self) -> Result<Vec<String>, InterchangeError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PNG_EXTENSION));
            if let (true, Some(name)) = (is_png, path.file_name().and_then(|n| n.to_str())) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Accept only a plain file name: no separators, no `.` / `..`.
fn validate_file_name(file_name: &str) -> Result<&str, InterchangeError> {
    let is_bare = !file_name.is_empty()
        && !file_name.contains(['/', '\\'])
        && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
    if is_bare {
        Ok(file_name)
    } else {
        Err(InterchangeError::InvalidFileName(file_name.to_string()))
    }
}
