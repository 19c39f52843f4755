//! The project policy: packages, their tags, and tag dependency rules.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EXCLUDE;
use crate::errors::ConfigError;

/// One declared package, keyed in [`ProjectConfig::packages`] by its root path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageConfig {
    pub tags: BTreeSet<String>,
    /// Members other packages may import. `None` means everything is public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<BTreeSet<String>>,
}

impl PackageConfig {
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            interface: None,
        }
    }
}

/// Declares the tags `tag` may depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDependencyRule {
    pub tag: String,
    #[serde(default)]
    pub depends_on: BTreeSet<String>,
}

impl TagDependencyRule {
    pub fn new<I, S>(tag: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag: tag.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
        }
    }
}

/// The contents of `tach.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub packages: BTreeMap<String, PackageConfig>,
    pub constraints: Vec<TagDependencyRule>,
    pub exclude: Vec<String>,
    pub exact: bool,
    pub exclude_hidden_paths: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            packages: BTreeMap::new(),
            constraints: Vec::new(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            exact: false,
            exclude_hidden_paths: true,
        }
    }
}

impl ProjectConfig {
    /// Every tag carried by at least one package.
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.packages
            .values()
            .flat_map(|pkg| pkg.tags.iter().cloned())
            .collect()
    }

    /// Rules merged per tag: several rules for one tag union their targets.
    pub fn merged_constraints(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for rule in &self.constraints {
            merged
                .entry(rule.tag.clone())
                .or_default()
                .extend(rule.depends_on.iter().cloned());
        }
        merged
    }

    /// Collapse duplicate rules and sort them by tag.
    pub fn normalize_constraints(&mut self) {
        self.constraints = self
            .merged_constraints()
            .into_iter()
            .map(|(tag, depends_on)| TagDependencyRule { tag, depends_on })
            .collect();
    }

    /// Rules declared in `original` that this (derived) policy does not need.
    ///
    /// Each returned rule lists only the unused targets of its tag.
    pub fn find_extra_constraints(&self, original: &ProjectConfig) -> Vec<TagDependencyRule> {
        let needed = self.merged_constraints();
        original
            .merged_constraints()
            .into_iter()
            .filter_map(|(tag, declared)| {
                let extra: BTreeSet<String> = match needed.get(&tag) {
                    Some(required) => declared.difference(required).cloned().collect(),
                    None => declared,
                };
                (!extra.is_empty()).then(|| TagDependencyRule {
                    tag,
                    depends_on: extra,
                })
            })
            .collect()
    }

    /// Validate packages only: paths and tags.
    pub fn validate_packages(&self) -> Result<(), ConfigError> {
        for (path, package) in &self.packages {
            validate_package_path(path)?;
            if package.tags.is_empty() {
                return Err(ConfigError::EmptyTags {
                    package: path.clone(),
                });
            }
            if package.tags.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::EmptyTag {
                    package: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Full validation: packages, and every tag a rule mentions must be
    /// carried by some package.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_packages()?;
        let known = self.all_tags();
        for rule in &self.constraints {
            let unknown = std::iter::once(&rule.tag)
                .chain(rule.depends_on.iter())
                .find(|tag| !known.contains(*tag));
            if let Some(tag) = unknown {
                return Err(ConfigError::UnknownTag { tag: tag.clone() });
            }
        }
        Ok(())
    }
}

fn validate_package_path(path: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidPackagePath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = path.trim().trim_start_matches("./").trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        return Err(invalid("the project root cannot be a package"));
    }
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the project root"))
            }
        }
    }
    Ok(())
}
