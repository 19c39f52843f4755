//! Module resolver: maps raw imports to declared packages.

pub mod module_path;
pub mod package_index;

use std::path::Path;
use std::sync::Arc;

pub use module_path::{resolve_relative, ModulePath};
pub use package_index::{Package, PackageId, PackageIndex};

use crate::parsers::RawImport;

/// Where an import points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    Package(PackageId),
    /// No declared package owns the path: stdlib, third-party, or unowned code.
    External,
    Unresolved { reason: String },
}

/// An import after relative-path normalization and package lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Absolute dotted path, or the raw path when it could not be resolved.
    pub module_path: String,
    pub target: ResolvedTarget,
}

/// A source file located in the package tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    pub module_path: ModulePath,
    /// Directory segments of the file, the base for relative imports.
    pub package_dir: Vec<String>,
    pub package: PackageId,
}

/// Resolves imports against a [`PackageIndex`].
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    index: Arc<PackageIndex>,
}

impl ModuleResolver {
    pub fn new(index: Arc<PackageIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &PackageIndex {
        &self.index
    }

    /// Locate a file (relative to the project root) in the package tree.
    /// Returns `None` for files outside every declared package.
    pub fn source_module(&self, relative: &Path) -> Option<SourceModule> {
        let module_path = ModulePath::from_file(relative)?;
        let package = self.index.find(&module_path)?;
        let package_dir = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| c.as_os_str().to_str())
                    .filter(|s| *s != ".")
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(SourceModule {
            module_path,
            package_dir,
            package,
        })
    }

    pub fn resolve(&self, source: &SourceModule, import: &RawImport) -> ResolvedImport {
        match resolve_relative(&source.package_dir, &import.path) {
            Some(absolute) => {
                let target = match self.index.find(&absolute) {
                    Some(id) => ResolvedTarget::Package(id),
                    None => ResolvedTarget::External,
                };
                ResolvedImport {
                    module_path: absolute.to_string(),
                    target,
                }
            }
            None => ResolvedImport {
                module_path: import.path.clone(),
                target: ResolvedTarget::Unresolved {
                    reason: if import.is_relative() {
                        "relative import goes beyond the project root".to_string()
                    } else {
                        "empty import path".to_string()
                    },
                },
            },
        }
    }
}
