//! BoundaryValidator: checks each dependency edge against the tag policy
//! and the target package's interface.

use std::collections::BTreeSet;

use rayon::prelude::*;

use super::types::{BoundaryError, ErrorInfo};
use crate::graph::{DependencyEdge, DependencyGraph};
use crate::policy::TagPolicy;
use crate::resolver::{ModulePath, PackageIndex};

/// Outcome of checking one edge against the tag policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeVerdict {
    Allowed,
    Violating { invalid_tags: BTreeSet<String> },
}

pub struct BoundaryValidator<'a> {
    index: &'a PackageIndex,
    policy: &'a TagPolicy,
}

impl<'a> BoundaryValidator<'a> {
    pub fn new(index: &'a PackageIndex, policy: &'a TagPolicy) -> Self {
        Self { index, policy }
    }

    pub fn classify(&self, edge: &DependencyEdge) -> EdgeVerdict {
        let source = self.index.get(edge.source);
        let target = self.index.get(edge.target);
        if self.policy.edge_allowed(&source.tags, &target.tags) {
            EdgeVerdict::Allowed
        } else {
            EdgeVerdict::Violating {
                invalid_tags: self.policy.unreachable_tags(&source.tags, &target.tags),
            }
        }
    }

    /// Errors for one edge. A violating edge reports every site as a tag
    /// error; interface errors are only looked for on allowed edges.
    pub fn check_edge(&self, edge: &DependencyEdge) -> Vec<BoundaryError> {
        let source = self.index.get(edge.source);
        let target = self.index.get(edge.target);

        match self.classify(edge) {
            EdgeVerdict::Violating { invalid_tags } => {
                let source_tags: Vec<String> = source.tags.iter().cloned().collect();
                let invalid_tags: Vec<String> = invalid_tags.into_iter().collect();
                edge.sites
                    .iter()
                    .map(|site| BoundaryError {
                        file_path: site.file_path.clone(),
                        line_number: Some(site.line_number),
                        import_mod_path: site.import_mod_path.clone(),
                        error_info: ErrorInfo::Tag {
                            source_tags: source_tags.clone(),
                            invalid_tags: invalid_tags.clone(),
                        },
                    })
                    .collect()
            }
            EdgeVerdict::Allowed if target.interface.is_some() => edge
                .sites
                .iter()
                .filter_map(|site| {
                    let member =
                        target.interface_violation(&ModulePath::from_dotted(&site.import_mod_path))?;
                    Some(BoundaryError {
                        file_path: site.file_path.clone(),
                        line_number: Some(site.line_number),
                        import_mod_path: site.import_mod_path.clone(),
                        error_info: ErrorInfo::Interface {
                            package: target.path.clone(),
                            member: member.to_string(),
                        },
                    })
                })
                .collect(),
            EdgeVerdict::Allowed => Vec::new(),
        }
    }

    /// Every error in the graph, structural issues included, sorted by file
    /// path then line.
    pub fn validate(&self, graph: &DependencyGraph) -> Vec<BoundaryError> {
        let edges: Vec<&DependencyEdge> = graph.edges().collect();
        let mut errors: Vec<BoundaryError> = edges
            .par_iter()
            .flat_map_iter(|edge| self.check_edge(edge))
            .collect();
        errors.extend(
            graph
                .structural_issues
                .iter()
                .cloned()
                .map(BoundaryError::from),
        );
        sort_errors(&mut errors);
        tracing::debug!(
            edges = edges.len(),
            errors = errors.len(),
            "boundary validation complete"
        );
        errors
    }
}

pub fn sort_errors(errors: &mut [BoundaryError]) {
    errors.sort_by(|a, b| {
        (&a.file_path, a.line_number, &a.import_mod_path).cmp(&(
            &b.file_path,
            b.line_number,
            &b.import_mod_path,
        ))
    });
}
