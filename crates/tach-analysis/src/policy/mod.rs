//! Tag policy: which tags may depend on which.
//!
//! A tag named by no rule is unrestricted. A tag with a rule, even an empty
//! one, may depend only on the listed tags and itself.

use std::collections::BTreeSet;

use tach_core::config::{ProjectConfig, TagDependencyRule};
use tach_core::types::collections::{FxHashMap, FxHashSet};

/// Adjacency map from a restricted tag to the tags it may depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPolicy {
    allowed: FxHashMap<String, FxHashSet<String>>,
}

impl TagPolicy {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::from_rules(&config.constraints)
    }

    /// Rules for the same tag are merged.
    pub fn from_rules(rules: &[TagDependencyRule]) -> Self {
        let mut allowed: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for rule in rules {
            allowed
                .entry(rule.tag.clone())
                .or_default()
                .extend(rule.depends_on.iter().cloned());
        }
        Self { allowed }
    }

    pub fn is_restricted(&self, tag: &str) -> bool {
        self.allowed.contains_key(tag)
    }

    pub fn is_allowed(&self, source: &str, target: &str) -> bool {
        if source == target {
            return true;
        }
        match self.allowed.get(source) {
            Some(deps) => deps.contains(target),
            None => true,
        }
    }

    /// A package with `source_tags` may import one with `target_tags` when
    /// any source tag is unrestricted or any tag pair is allowed.
    pub fn edge_allowed<'a, S, T>(&self, source_tags: S, target_tags: T) -> bool
    where
        S: IntoIterator<Item = &'a String>,
        T: IntoIterator<Item = &'a String> + Clone,
    {
        source_tags.into_iter().any(|s| {
            !self.is_restricted(s)
                || target_tags
                    .clone()
                    .into_iter()
                    .any(|t| self.is_allowed(s, t))
        })
    }

    /// Target tags no source tag may depend on.
    pub fn unreachable_tags(
        &self,
        source_tags: &BTreeSet<String>,
        target_tags: &BTreeSet<String>,
    ) -> BTreeSet<String> {
        target_tags
            .iter()
            .filter(|t| !source_tags.iter().any(|s| self.is_allowed(s, t)))
            .cloned()
            .collect()
    }

    /// Allow `source` to depend on `target`. Self-pairs are implicit and skipped.
    pub fn allow(&mut self, source: &str, target: &str) {
        let deps = self.allowed.entry(source.to_string()).or_default();
        if source != target {
            deps.insert(target.to_string());
        }
    }

    /// Add an empty rule for `tag` if it has none.
    pub fn restrict(&mut self, tag: &str) {
        self.allowed.entry(tag.to_string()).or_default();
    }

    /// Rules sorted by tag, with sorted targets.
    pub fn to_rules(&self) -> Vec<TagDependencyRule> {
        let mut rules: Vec<TagDependencyRule> = self
            .allowed
            .iter()
            .map(|(tag, deps)| TagDependencyRule::new(tag.clone(), deps.iter().cloned()))
            .collect();
        rules.sort_by(|a, b| a.tag.cmp(&b.tag));
        rules
    }
}
