//! Package dependency graph.

pub mod builder;
pub mod types;

pub use builder::DependencyGraphBuilder;
pub use types::{DependencyEdge, DependencyGraph, ImportSite, StructuralIssue};
