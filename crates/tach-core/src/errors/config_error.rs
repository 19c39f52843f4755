//! Policy file errors. All of them are fatal and reported before scanning.

use std::path::PathBuf;

use super::error_code::{self, TachErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No tach.yml found in {} or any parent directory", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize project config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Package '{package}' must declare at least one tag")]
    EmptyTags { package: String },

    #[error("Package '{package}' declares an empty tag")]
    EmptyTag { package: String },

    #[error("Invalid package path '{path}': {reason}")]
    InvalidPackagePath { path: String, reason: String },

    #[error("Packages '{first}' and '{second}' resolve to the same module '{module}'")]
    DuplicatePackage {
        first: String,
        second: String,
        module: String,
    },

    #[error("Constraint references tag '{tag}', which no package declares")]
    UnknownTag { tag: String },
}

impl TachErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::CONFIG_NOT_FOUND,
            Self::Read { .. } | Self::Write { .. } => error_code::CONFIG_IO,
            Self::UnknownTag { .. } => error_code::UNKNOWN_TAG,
            _ => error_code::CONFIG_INVALID,
        }
    }
}
