//! Error types, one enum per concern.

pub mod config_error;
pub mod error_code;
pub mod parse_error;
pub mod project_error;
pub mod scan_error;

pub use config_error::ConfigError;
pub use parse_error::ParseError;
pub use project_error::{ProjectError, ProjectResult};
pub use scan_error::ScanError;
