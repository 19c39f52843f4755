//! # tach-analysis
//!
//! Boundary engine for tach. Scans a Python project, extracts imports,
//! resolves them to declared packages, aggregates a package dependency
//! graph, and checks it against the project's tag policy.
//!
//! Pipeline: scanner → parsers → resolver → graph → {boundaries, sync}.

pub mod boundaries;
pub mod engine;
pub mod graph;
pub mod parsers;
pub mod policy;
pub mod project;
pub mod resolver;
pub mod scanner;
pub mod sync;

pub use boundaries::types::{BoundaryError, ErrorInfo};
pub use engine::{check, prune_dependency_constraints, BoundaryEngine, CheckReport};
pub use project::{add_packages, clean_project, init_project, sync_project};
