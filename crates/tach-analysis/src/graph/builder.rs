//! DependencyGraphBuilder: single accumulator for per-file results.

use std::path::PathBuf;

use tach_core::errors::ParseError;

use super::types::{DependencyEdge, DependencyGraph, ImportSite, StructuralIssue};
use crate::resolver::{PackageId, ResolvedTarget};

/// Accumulates import sites into a [`DependencyGraph`].
///
/// Insertion order does not matter: [`build`](Self::build) sorts everything.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    graph: DependencyGraph,
}

impl DependencyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one import from package `source`. Self-imports are dropped.
    pub fn add_site(&mut self, source: PackageId, site: ImportSite) {
        match site.target.clone() {
            ResolvedTarget::Package(target) if target == source => {}
            ResolvedTarget::Package(target) => {
                self.graph
                    .edges
                    .entry((source, target))
                    .or_insert_with(|| DependencyEdge {
                        source,
                        target,
                        sites: Vec::new(),
                    })
                    .sites
                    .push(site);
            }
            ResolvedTarget::External => self.graph.external.push(site),
            ResolvedTarget::Unresolved { reason } => {
                self.graph.structural_issues.push(StructuralIssue {
                    file_path: site.file_path,
                    line_number: Some(site.line_number),
                    message: format!("Unable to resolve '{}': {reason}", site.import_mod_path),
                    import_mod_path: site.import_mod_path,
                });
            }
        }
    }

    /// Record a file that could not be read or parsed.
    pub fn add_parse_error(&mut self, file_path: PathBuf, error: &ParseError) {
        self.graph.structural_issues.push(StructuralIssue {
            file_path,
            line_number: error.line(),
            import_mod_path: String::new(),
            message: error.to_string(),
        });
    }

    pub fn mark_file_scanned(&mut self) {
        self.graph.files_scanned += 1;
    }

    pub fn build(mut self) -> DependencyGraph {
        let by_location = |a: &ImportSite, b: &ImportSite| {
            (&a.file_path, a.line_number).cmp(&(&b.file_path, b.line_number))
        };
        for edge in self.graph.edges.values_mut() {
            edge.sites.sort_by(by_location);
        }
        self.graph.external.sort_by(by_location);
        self.graph
            .structural_issues
            .sort_by(|a, b| (&a.file_path, a.line_number).cmp(&(&b.file_path, b.line_number)));
        self.graph
    }
}
