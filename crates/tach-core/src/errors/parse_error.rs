//! Per-file parse errors. These never abort a run; the engine turns each one
//! into a single structural boundary error.

use std::path::PathBuf;

use super::error_code::{self, TachErrorCode};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar not available for {language}")]
    GrammarNotFound { language: String },

    #[error("Parser failed on {}: {message}", path.display())]
    TreeSitterError { path: PathBuf, message: String },

    #[error("Syntax error at line {line}: {message}")]
    Syntax {
        path: PathBuf,
        line: u32,
        message: String,
    },

    #[error("Failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl ParseError {
    /// The 1-based line the error points at, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl TachErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => error_code::SYNTAX_ERROR,
            _ => error_code::PARSE_ERROR,
        }
    }
}
