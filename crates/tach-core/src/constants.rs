//! Workspace-wide constants.

/// Name of the tool, used in user-facing messages.
pub const TOOL_NAME: &str = "tach";

/// Stem of the policy file at the project root.
pub const CONFIG_FILE_NAME: &str = "tach";

/// Accepted policy file extensions, in lookup order.
pub const CONFIG_FILE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Extension of the source files the engine scans.
pub const PYTHON_EXTENSION: &str = "py";

/// File that marks a directory as a Python package.
pub const PACKAGE_INIT_FILE: &str = "__init__.py";

/// Paths excluded from every scan unless the policy file overrides them.
pub const DEFAULT_EXCLUDE: &[&str] = &["tests", "docs"];

/// Files whose extracted imports are kept in memory between scans.
pub const DEFAULT_PARSE_CACHE_CAPACITY: u64 = 10_000;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TACH_LOG";
