//! Source scanner: discovers the Python files a check covers.

pub mod cancellation;
pub mod exclude;
pub mod hasher;
pub mod walker;

pub use cancellation::ScanCancellation;
pub use exclude::ExcludeMatcher;
pub use walker::{SourceFiles, SourceScanner};
