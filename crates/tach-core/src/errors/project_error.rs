//! Errors surfaced by engine entry points (check, sync, add, init, clean).

use std::path::PathBuf;

use super::error_code::{self, TachErrorCode};
use super::{ConfigError, ScanError};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Path '{}' does not exist", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Path '{}' is outside the project root", path.display())]
    OutsideProject { path: PathBuf },

    #[error("Path '{}' is not a Python module or directory", path.display())]
    NotAModule { path: PathBuf },

    #[error("Project already initialized: {} exists", path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

impl TachErrorCode for ProjectError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            _ => error_code::PROJECT_ERROR,
        }
    }
}
