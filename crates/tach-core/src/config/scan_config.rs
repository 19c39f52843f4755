//! Scanner configuration.

use super::ProjectConfig;

/// Configuration for the source scanner.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Paths to skip, relative to the project root. Entries match an exact
    /// path, any path below it, or a glob pattern.
    pub exclude: Vec<String>,
    /// Skip every path with a component starting with `.`. Default: true.
    pub exclude_hidden_paths: bool,
    /// Number of threads. 0 = auto-detect.
    pub threads: Option<usize>,
    /// Follow symbolic links. Default: false.
    pub follow_symlinks: Option<bool>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            exclude_hidden_paths: true,
            threads: None,
            follow_symlinks: None,
        }
    }
}

impl ScanConfig {
    /// Build the scan settings for a project, merging the policy file's
    /// exclude list with any extra paths given on the command line.
    pub fn for_project(project: &ProjectConfig, extra_exclude: &[String]) -> Self {
        let mut exclude = extra_exclude.to_vec();
        for path in &project.exclude {
            if !exclude.contains(path) {
                exclude.push(path.clone());
            }
        }
        Self {
            exclude,
            exclude_hidden_paths: project.exclude_hidden_paths,
            ..Self::default()
        }
    }

    /// Returns the effective thread count, defaulting to 0 (auto-detect).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns whether symlinks are followed, defaulting to false.
    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }
}

/// Split the comma-separated external form of an exclude list.
pub fn parse_exclude_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
