//! Dependency graph types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::resolver::{PackageId, ResolvedTarget};

/// One observed import, located in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Importing file, relative to the project root.
    pub file_path: PathBuf,
    /// 1-based line of the import statement.
    pub line_number: u32,
    /// Fully-qualified imported module path.
    pub import_mod_path: String,
    pub target: ResolvedTarget,
}

/// All imports from one package into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub source: PackageId,
    pub target: PackageId,
    /// Never empty. Sorted by file path, then line.
    pub sites: Vec<ImportSite>,
}

/// A problem that prevents checking part of the code: an unreadable or
/// unparsable file, or an import that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralIssue {
    pub file_path: PathBuf,
    pub line_number: Option<u32>,
    pub import_mod_path: String,
    pub message: String,
}

/// Package-level dependency graph for one scan.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub edges: BTreeMap<(PackageId, PackageId), DependencyEdge>,
    /// Imports no declared package owns. Kept for reporting, never checked.
    pub external: Vec<ImportSite>,
    pub structural_issues: Vec<StructuralIssue>,
    pub files_scanned: usize,
}

impl DependencyGraph {
    pub fn edge(&self, source: PackageId, target: PackageId) -> Option<&DependencyEdge> {
        self.edges.get(&(source, target))
    }

    pub fn edges(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
