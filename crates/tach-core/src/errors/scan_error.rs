//! Scanner errors. Per-file problems are not errors at this level: the
//! scanner logs and skips them.

use std::path::PathBuf;

use super::error_code::{self, TachErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Scan root {} is not a directory", path.display())]
    RootNotFound { path: PathBuf },

    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidExclude { pattern: String, message: String },

    #[error("Scan cancelled")]
    Cancelled,
}

impl TachErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => error_code::SCAN_CANCELLED,
            _ => error_code::SCAN_ERROR,
        }
    }
}
