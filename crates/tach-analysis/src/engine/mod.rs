//! BoundaryEngine: one project, one policy, reusable across scans.
//!
//! The engine owns the scanner, resolver, and import cache. Scanning twice
//! (as an exact check does) re-reads files but serves unchanged ones from
//! the cache.

mod pipeline;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tach_core::config::{ProjectConfig, ScanConfig, TagDependencyRule};
use tach_core::errors::{ProjectResult, ScanError};

use crate::boundaries::{BoundaryError, BoundaryValidator};
use crate::graph::DependencyGraph;
use crate::parsers::ImportExtractor;
use crate::policy::TagPolicy;
use crate::resolver::{ModuleResolver, PackageIndex};
use crate::scanner::{ScanCancellation, SourceScanner};
use crate::sync::ConstraintSynchronizer;

use pipeline::Pipeline;

/// Outcome of `check`, with exact mode's unused rules when requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub errors: Vec<BoundaryError>,
    pub extra_constraints: Vec<TagDependencyRule>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.extra_constraints.is_empty()
    }
}

pub struct BoundaryEngine {
    root: PathBuf,
    config: ProjectConfig,
    index: Arc<PackageIndex>,
    resolver: ModuleResolver,
    scanner: SourceScanner,
    extractor: ImportExtractor,
    cancellation: ScanCancellation,
}

impl BoundaryEngine {
    /// Engine over `root` with the policy's excludes plus `exclude`.
    pub fn new(root: &Path, config: ProjectConfig, exclude: &[String]) -> ProjectResult<Self> {
        let scan = ScanConfig::for_project(&config, exclude);
        Self::with_scan_config(root, config, scan)
    }

    pub fn with_scan_config(
        root: &Path,
        config: ProjectConfig,
        scan: ScanConfig,
    ) -> ProjectResult<Self> {
        let index = Arc::new(PackageIndex::from_config(&config)?);
        let scanner = SourceScanner::new(root, scan)?;
        Ok(Self {
            root: root.to_path_buf(),
            resolver: ModuleResolver::new(Arc::clone(&index)),
            index,
            config,
            scanner,
            extractor: ImportExtractor::new(),
            cancellation: ScanCancellation::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn index(&self) -> &PackageIndex {
        &self.index
    }

    /// Handle for cancelling scans from another thread.
    pub fn cancellation(&self) -> ScanCancellation {
        self.cancellation.clone()
    }

    pub fn build_graph(&self) -> Result<DependencyGraph, ScanError> {
        Pipeline {
            scanner: &self.scanner,
            resolver: &self.resolver,
            extractor: &self.extractor,
            cancellation: &self.cancellation,
        }
        .run()
    }

    /// Every boundary error in the project, sorted by file then line.
    pub fn check(&self) -> ProjectResult<Vec<BoundaryError>> {
        self.config.validate()?;
        let graph = self.build_graph()?;
        let policy = TagPolicy::from_config(&self.config);
        Ok(BoundaryValidator::new(&self.index, &policy).validate(&graph))
    }

    /// `check`, plus unused declared rules when there are no errors.
    pub fn check_exact(&self) -> ProjectResult<CheckReport> {
        let errors = self.check()?;
        if !errors.is_empty() {
            return Ok(CheckReport {
                errors,
                extra_constraints: Vec::new(),
            });
        }
        let derived = self.derive_config()?;
        Ok(CheckReport {
            errors,
            extra_constraints: derived.find_extra_constraints(&self.config),
        })
    }

    /// The policy with its rules replaced by the minimal set the code needs.
    pub fn derive_config(&self) -> ProjectResult<ProjectConfig> {
        let graph = self.build_graph()?;
        let mut derived = self.config.clone();
        derived.constraints = ConstraintSynchronizer::new(&self.index).derive_rules(&graph);
        Ok(derived)
    }

    /// The policy updated to match the code. With `prune`, rules are derived
    /// from scratch; otherwise declared rules are only extended.
    pub fn sync(&self, prune: bool) -> ProjectResult<ProjectConfig> {
        if prune {
            return self.derive_config();
        }
        self.config.validate()?;
        let graph = self.build_graph()?;
        let declared = TagPolicy::from_config(&self.config);
        let synced = ConstraintSynchronizer::new(&self.index).sync_rules(&graph, &declared);
        let mut config = self.config.clone();
        config.constraints = synced.to_rules();
        Ok(config)
    }
}

/// Check `root` against `config`, returning every boundary error.
pub fn check(
    root: &Path,
    config: &ProjectConfig,
    exclude_paths: &[String],
    exclude_hidden_paths: bool,
) -> ProjectResult<Vec<BoundaryError>> {
    let config = ProjectConfig {
        exclude_hidden_paths,
        ..config.clone()
    };
    BoundaryEngine::new(root, config, exclude_paths)?.check()
}

/// `config` with its rules reduced to what the code in `root` uses.
///
/// Pair with [`ProjectConfig::find_extra_constraints`] to list the unused rules.
pub fn prune_dependency_constraints(
    root: &Path,
    config: &ProjectConfig,
    exclude_paths: &[String],
) -> ProjectResult<ProjectConfig> {
    BoundaryEngine::new(root, config.clone(), exclude_paths)?.derive_config()
}
