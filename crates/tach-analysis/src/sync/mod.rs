//! Constraint synchronizer: derives tag rules from the observed graph.

use tach_core::config::TagDependencyRule;
use tach_core::types::collections::FxHashSet;

use crate::graph::DependencyGraph;
use crate::policy::TagPolicy;
use crate::resolver::PackageIndex;

pub struct ConstraintSynchronizer<'a> {
    index: &'a PackageIndex,
}

impl<'a> ConstraintSynchronizer<'a> {
    pub fn new(index: &'a PackageIndex) -> Self {
        Self { index }
    }

    /// The minimal policy the graph needs, built from scratch.
    ///
    /// Every package tag gets a rule, empty when the tag depends on nothing.
    /// Edges between packages sharing a tag need no rule.
    pub fn derive_rules(&self, graph: &DependencyGraph) -> Vec<TagDependencyRule> {
        let mut baseline = TagPolicy::default();
        for tag in self.index.all_tags() {
            baseline.restrict(&tag);
        }
        let mut policy = baseline.clone();
        for (source, target) in self.tag_pairs(graph, &baseline) {
            policy.allow(source, target);
        }
        policy.to_rules()
    }

    /// `declared` extended so every edge in the graph is allowed.
    ///
    /// Edges the declared policy already allows are left alone, and no
    /// existing allowance is removed.
    pub fn sync_rules(&self, graph: &DependencyGraph, declared: &TagPolicy) -> TagPolicy {
        let mut synced = declared.clone();
        let mut added = 0usize;
        for (source, target) in self.tag_pairs(graph, declared) {
            if !synced.is_allowed(source, target) {
                added += 1;
            }
            synced.allow(source, target);
        }
        tracing::debug!(added, "constraints synced");
        synced
    }

    /// Distinct (source tag, target tag) pairs across the edges `policy`
    /// does not already allow.
    fn tag_pairs<'g>(
        &'g self,
        graph: &'g DependencyGraph,
        policy: &TagPolicy,
    ) -> Vec<(&'g str, &'g str)> {
        let mut seen: FxHashSet<(&str, &str)> = FxHashSet::default();
        let mut pairs = Vec::new();
        for edge in graph.edges() {
            let source = self.index.get(edge.source);
            let target = self.index.get(edge.target);
            if policy.edge_allowed(&source.tags, &target.tags) {
                continue;
            }
            for s in &source.tags {
                for t in &target.tags {
                    if s != t && seen.insert((s.as_str(), t.as_str())) {
                        pairs.push((s.as_str(), t.as_str()));
                    }
                }
            }
        }
        pairs
    }
}
