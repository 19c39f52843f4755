//! Stable error codes for every error the engine can surface.

/// Maps an error variant to a stable, upper-snake error code.
pub trait TachErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const CONFIG_IO: &str = "CONFIG_IO";
pub const UNKNOWN_TAG: &str = "UNKNOWN_TAG";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const SCAN_CANCELLED: &str = "SCAN_CANCELLED";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
pub const PROJECT_ERROR: &str = "PROJECT_ERROR";
