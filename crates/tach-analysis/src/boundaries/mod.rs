//! Boundary validation: tag policy and package interfaces.

pub mod types;
pub mod validator;

pub use types::{BoundaryError, ErrorInfo};
pub use validator::{sort_errors, BoundaryValidator, EdgeVerdict};
