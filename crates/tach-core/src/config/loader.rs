//! Locating, reading, and writing `tach.yml`.

use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_FILE_EXTENSIONS, CONFIG_FILE_NAME};
use crate::errors::ConfigError;

use super::ProjectConfig;

/// Path of the existing policy file in `root`, if any.
pub fn config_path(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_EXTENSIONS
        .iter()
        .map(|ext| root.join(format!("{CONFIG_FILE_NAME}.{ext}")))
        .find(|path| path.is_file())
}

/// Path a new policy file is written to.
fn default_config_path(root: &Path) -> PathBuf {
    root.join(format!("{CONFIG_FILE_NAME}.{}", CONFIG_FILE_EXTENSIONS[0]))
}

/// Walk up from `start` to the nearest directory holding a policy file.
pub fn find_project_config_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| config_path(dir).is_some())
        .map(Path::to_path_buf)
}

/// Read and validate the policy file in `root`.
pub fn parse_project_config(root: &Path) -> Result<ProjectConfig, ConfigError> {
    let config = read_project_config(root)?;
    config.validate()?;
    Ok(config)
}

/// Read the policy file in `root` without cross-checking rule tags.
pub fn read_project_config(root: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = config_path(root).ok_or_else(|| ConfigError::NotFound {
        path: root.to_path_buf(),
    })?;
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml { path, source })
}

/// Write `config` to the policy file in `root`, replacing any existing one.
///
/// Constraints are normalized (merged per tag, sorted) before writing.
pub fn write_project_config(root: &Path, config: &ProjectConfig) -> Result<PathBuf, ConfigError> {
    let mut normalized = config.clone();
    normalized.normalize_constraints();
    let yaml = serde_yaml::to_string(&normalized)?;

    let path = config_path(root).unwrap_or_else(|| default_config_path(root));
    std::fs::write(&path, yaml).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), packages = normalized.packages.len(), "Project config written");
    Ok(path)
}

/// Delete the policy file in `root`.
pub fn delete_project_config(root: &Path) -> Result<PathBuf, ConfigError> {
    let path = config_path(root).ok_or_else(|| ConfigError::NotFound {
        path: root.to_path_buf(),
    })?;
    std::fs::remove_file(&path).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Project config deleted");
    Ok(path)
}
