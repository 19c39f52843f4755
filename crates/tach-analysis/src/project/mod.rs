//! Project operations: read the policy file, run the engine, write it back.

use std::path::{Path, PathBuf};

use tach_core::config::{
    config_path, delete_project_config, read_project_config, write_project_config, PackageConfig,
    ProjectConfig, ScanConfig,
};
use tach_core::constants::PYTHON_EXTENSION;
use tach_core::errors::{ProjectError, ProjectResult};

use crate::engine::BoundaryEngine;
use crate::policy::TagPolicy;
use crate::resolver::ModulePath;
use crate::scanner::SourceScanner;

/// Default depth for package discovery in `init_project`.
pub const DEFAULT_INIT_DEPTH: usize = 1;

/// Bring the policy file's rules in line with the code and write it.
///
/// Without `prune`, rules are only added. With `prune`, they are derived
/// from scratch, which drops unused ones.
pub fn sync_project(root: &Path, prune: bool, exclude: &[String]) -> ProjectResult<ProjectConfig> {
    let config = read_project_config(root)?;
    let engine = BoundaryEngine::new(root, config, exclude)?;
    let synced = engine.sync(prune)?;
    write_project_config(root, &synced)?;
    tracing::info!(prune, rules = synced.constraints.len(), "project synced");
    Ok(synced)
}

/// Register `paths` as packages, then sync so the new boundaries pass.
///
/// Paths are relative to `root` (or absolute inside it). Each package gets
/// `tags`, or its dotted module path when no tags are given. A new tag
/// starts with an empty rule, so after the sync it may depend only on what
/// the package imports today. Returns warnings for paths that were already
/// registered.
pub fn add_packages(
    root: &Path,
    paths: &[PathBuf],
    tags: Option<&[String]>,
) -> ProjectResult<Vec<String>> {
    let mut config = read_project_config(root)?;
    let canonical_root = root.canonicalize()?;
    let mut warnings = Vec::new();
    let mut added_tags: Vec<String> = Vec::new();

    for path in paths {
        let relative = package_root(&canonical_root, &root.join(path))?;
        if config.packages.contains_key(&relative) {
            warnings.push(format!("Package '{relative}' is already registered."));
            continue;
        }
        let package_tags: Vec<String> = match tags {
            Some(tags) if !tags.is_empty() => tags.to_vec(),
            _ => vec![default_tag(&relative)?],
        };
        tracing::info!(package = %relative, tags = ?package_tags, "package added");
        added_tags.extend(package_tags.iter().cloned());
        config
            .packages
            .insert(relative, PackageConfig::with_tags(package_tags));
    }

    if !added_tags.is_empty() {
        let mut policy = TagPolicy::from_config(&config);
        for tag in &added_tags {
            policy.restrict(tag);
        }
        config.constraints = policy.to_rules();
    }

    config.validate_packages()?;
    write_project_config(root, &config)?;
    sync_project(root, false, &[])?;
    Ok(warnings)
}

/// Create a policy file for the Python packages under `root`.
///
/// Directories holding an `__init__.py` down to `depth` become packages,
/// outermost first, each tagged with its dotted path. The rules are then
/// derived from the code. Fails when a policy file already exists.
pub fn init_project(
    root: &Path,
    depth: Option<usize>,
    exclude: &[String],
) -> ProjectResult<Vec<String>> {
    if let Some(existing) = config_path(root) {
        return Err(ProjectError::AlreadyInitialized { path: existing });
    }
    let depth = depth.unwrap_or(DEFAULT_INIT_DEPTH).max(1);

    let mut config = ProjectConfig::default();
    let scanner = SourceScanner::new(root, ScanConfig::for_project(&config, exclude))?;
    let mut warnings = Vec::new();

    for dir in scanner.package_directories(depth) {
        let Ok(relative) = dir.strip_prefix(root) else {
            continue;
        };
        let relative = slash_path(relative);
        let tag = default_tag(&relative)?;
        config
            .packages
            .insert(relative, PackageConfig::with_tags([tag]));
    }

    if config.packages.is_empty() {
        warnings.push(format!(
            "No packages found within depth {depth}. Add packages with 'tach add'."
        ));
    }
    tracing::info!(packages = config.packages.len(), depth, "project initialized");

    config.exclude = merge_excludes(&config.exclude, exclude);
    write_project_config(root, &config)?;
    sync_project(root, true, exclude)?;
    Ok(warnings)
}

/// Delete the policy file.
pub fn clean_project(root: &Path) -> ProjectResult<PathBuf> {
    Ok(delete_project_config(root)?)
}

/// Policy-file form of a package path: relative to the root, `/`-separated.
fn package_root(canonical_root: &Path, path: &Path) -> ProjectResult<String> {
    if !path.exists() {
        return Err(ProjectError::PathNotFound {
            path: path.to_path_buf(),
        });
    }
    let canonical = path.canonicalize()?;
    let relative = canonical
        .strip_prefix(canonical_root)
        .map_err(|_| ProjectError::OutsideProject {
            path: path.to_path_buf(),
        })?;
    if relative.as_os_str().is_empty() {
        return Err(ProjectError::OutsideProject {
            path: path.to_path_buf(),
        });
    }

    let is_module = canonical.is_dir()
        || canonical
            .extension()
            .is_some_and(|ext| ext == PYTHON_EXTENSION);
    if !is_module {
        return Err(ProjectError::NotAModule {
            path: path.to_path_buf(),
        });
    }
    Ok(slash_path(relative))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn default_tag(package_root: &str) -> ProjectResult<String> {
    ModulePath::from_package_root(package_root)
        .map(|module| module.to_string())
        .ok_or_else(|| ProjectError::NotAModule {
            path: PathBuf::from(package_root),
        })
}

/// Defaults first, then the extra entries not already present.
fn merge_excludes(defaults: &[String], extra: &[String]) -> Vec<String> {
    let mut merged = defaults.to_vec();
    for entry in extra {
        if !merged.contains(entry) {
            merged.push(entry.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tag_is_dotted_module_path() {
        assert_eq!(default_tag("src/core").unwrap(), "src.core");
        assert_eq!(default_tag("utils.py").unwrap(), "utils");
    }

    #[test]
    fn excludes_merge_without_duplicates() {
        let merged = merge_excludes(
            &["tests".to_string(), "docs".to_string()],
            &["docs".to_string(), "build".to_string()],
        );
        assert_eq!(merged, vec!["tests", "docs", "build"]);
    }

    #[test]
    fn package_root_rejects_non_modules_and_escapes() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join("README.md"), "").unwrap();
        std::fs::create_dir(root.join("core")).unwrap();

        assert_eq!(package_root(&root, &root.join("core")).unwrap(), "core");
        assert!(matches!(
            package_root(&root, &root.join("README.md")),
            Err(ProjectError::NotAModule { .. })
        ));
        assert!(matches!(
            package_root(&root, &root.join("missing")),
            Err(ProjectError::PathNotFound { .. })
        ));
        assert!(matches!(
            package_root(&root, &root.join("..")),
            Err(ProjectError::OutsideProject { .. })
        ));
    }
}
