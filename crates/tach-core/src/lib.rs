//! # tach-core
//!
//! Foundation crate for the tach boundary engine.
//! Defines the policy file model, scan configuration, errors, tracing setup,
//! and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{PackageConfig, ProjectConfig, ScanConfig, TagDependencyRule};
pub use errors::error_code::TachErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
