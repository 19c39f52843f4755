//! Boundary error records.

use std::fmt;
use std::path::PathBuf;

use crate::graph::StructuralIssue;

/// What went wrong at one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorInfo {
    /// The importing package's tags may not depend on the target's.
    Tag {
        source_tags: Vec<String>,
        invalid_tags: Vec<String>,
    },
    /// The import reaches a member outside the target package's interface.
    Interface { package: String, member: String },
    /// Unreadable or unparsable file, or an unresolvable import.
    Structural { message: String },
}

impl ErrorInfo {
    pub fn is_tag_error(&self) -> bool {
        matches!(self, Self::Tag { .. })
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }
}

/// One reported problem, tied to a file and usually a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryError {
    /// Relative to the project root.
    pub file_path: PathBuf,
    pub line_number: Option<u32>,
    pub import_mod_path: String,
    pub error_info: ErrorInfo,
}

impl BoundaryError {
    /// Human-readable message, without the location.
    pub fn message(&self) -> String {
        match &self.error_info {
            ErrorInfo::Tag {
                source_tags,
                invalid_tags,
            } => format!(
                "Cannot import '{}'. Tags {source_tags:?} cannot depend on {invalid_tags:?}.",
                self.import_mod_path
            ),
            ErrorInfo::Interface { package, member } => format!(
                "Cannot import '{}'. '{member}' is not part of the public interface of '{package}'.",
                self.import_mod_path
            ),
            ErrorInfo::Structural { message } => message.clone(),
        }
    }
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_path.display())?;
        if let Some(line) = self.line_number {
            write!(f, ":{line}")?;
        }
        write!(f, ": {}", self.message())
    }
}

impl From<StructuralIssue> for BoundaryError {
    fn from(issue: StructuralIssue) -> Self {
        Self {
            file_path: issue.file_path,
            line_number: issue.line_number,
            import_mod_path: issue.import_mod_path,
            error_info: ErrorInfo::Structural {
                message: issue.message,
            },
        }
    }
}
