//! Exclude rules: exact paths, path prefixes, and glob patterns.
//!
//! Entries become negated `ignore` overrides (gitignore syntax). Plain paths
//! are anchored at the project root and cover everything below them; glob
//! entries are passed through as written.

use std::path::{Component, Path};

use ignore::overrides::{Override, OverrideBuilder};
use tach_core::errors::ScanError;

/// Matches paths under the project root against the configured exclude list.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    overrides: Override,
    is_empty: bool,
}

impl ExcludeMatcher {
    pub fn new(root: &Path, entries: &[String]) -> Result<Self, ScanError> {
        let mut builder = OverrideBuilder::new(root);
        let mut is_empty = true;
        for entry in entries {
            let normalized = normalize(entry);
            if normalized.is_empty() {
                continue;
            }
            let patterns = if normalized.contains(['*', '?', '[']) {
                vec![format!("!{normalized}")]
            } else {
                vec![format!("!/{normalized}"), format!("!/{normalized}/**")]
            };
            for pattern in patterns {
                builder
                    .add(&pattern)
                    .map_err(|e| ScanError::InvalidExclude {
                        pattern: entry.clone(),
                        message: e.to_string(),
                    })?;
            }
            is_empty = false;
        }
        let overrides = builder.build().map_err(|e| ScanError::InvalidExclude {
            pattern: entries.join(","),
            message: e.to_string(),
        })?;
        Ok(Self {
            overrides,
            is_empty,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Overrides to install on a walker rooted at the same directory.
    pub fn overrides(&self) -> Override {
        self.overrides.clone()
    }

    /// Whether `path` (relative to the root, or absolute beneath it) is excluded.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        let has_components = path
            .components()
            .any(|c| matches!(c, Component::Normal(_)));
        has_components && self.overrides.matched(path, is_dir).is_ignore()
    }
}

fn normalize(entry: &str) -> String {
    let mut s = entry.trim().replace('\\', "/");
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    s.trim_start_matches('/').trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(entries: &[&str]) -> ExcludeMatcher {
        let owned: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
        ExcludeMatcher::new(Path::new("/proj"), &owned).unwrap()
    }

    #[test]
    fn prefix_matches_on_component_boundary() {
        let m = matcher(&["tests/", "./docs"]);
        assert!(m.is_excluded(Path::new("tests"), true));
        assert!(m.is_excluded(Path::new("tests/unit/test_a.py"), false));
        assert!(m.is_excluded(Path::new("docs/conf.py"), false));
        assert!(!m.is_excluded(Path::new("tests_helpers/a.py"), false));
        assert!(!m.is_excluded(Path::new("src/tests.py"), false));
    }

    #[test]
    fn plain_paths_are_anchored_at_the_root() {
        let m = matcher(&["tests"]);
        assert!(!m.is_excluded(Path::new("src/tests"), true));
        assert!(m.is_excluded(Path::new("/proj/tests/a.py"), false));
    }

    #[test]
    fn exact_file_path_is_excluded() {
        let m = matcher(&["src/generated.py"]);
        assert!(m.is_excluded(Path::new("src/generated.py"), false));
        assert!(!m.is_excluded(Path::new("src/generated_other.py"), false));
    }

    #[test]
    fn glob_patterns_are_supported() {
        let m = matcher(&["**/migrations", "*_pb2.py"]);
        assert!(m.is_excluded(Path::new("app/db/migrations"), true));
        assert!(m.is_excluded(Path::new("proto/api_pb2.py"), false));
        assert!(!m.is_excluded(Path::new("app/db/models.py"), false));
    }

    #[test]
    fn root_is_never_excluded() {
        let m = matcher(&["*"]);
        assert!(!m.is_excluded(Path::new(""), true));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let m = matcher(&["", " "]);
        assert!(m.is_empty());
        assert!(!m.is_excluded(Path::new("a.py"), false));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let err = ExcludeMatcher::new(Path::new("/proj"), &["src/[".to_string()]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidExclude { .. }));
    }
}
