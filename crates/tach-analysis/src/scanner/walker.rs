//! File walker built on the `ignore` crate.
//!
//! Two front ends share one `WalkBuilder` setup: a lazy sequential iterator
//! ([`SourceScanner::files`]) and a parallel collector
//! ([`SourceScanner::collect_parallel`]) feeding a crossbeam channel.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crossbeam_channel as channel;
use ignore::{DirEntry, WalkBuilder, WalkState};
use tach_core::config::ScanConfig;
use tach_core::constants::{PACKAGE_INIT_FILE, PYTHON_EXTENSION};
use tach_core::errors::ScanError;

use super::cancellation::ScanCancellation;
use super::exclude::ExcludeMatcher;

/// Discovers Python source files under a project root.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    root: PathBuf,
    config: ScanConfig,
    excludes: ExcludeMatcher,
}

impl SourceScanner {
    /// Create a scanner for `root`. Fails if `root` is not a directory or an
    /// exclude pattern does not compile.
    pub fn new(root: &Path, config: ScanConfig) -> Result<Self, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let excludes = ExcludeMatcher::new(root, &config.exclude)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            excludes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Lazily iterate source files. Each call starts a fresh walk.
    pub fn files(&self) -> SourceFiles {
        SourceFiles {
            inner: self.walk_builder().build(),
        }
    }

    /// Walk in parallel and return every source file, sorted by path.
    ///
    /// Stops early when `cancellation` fires; the caller decides what a
    /// partial result means.
    pub fn collect_parallel(&self, cancellation: &ScanCancellation) -> Vec<PathBuf> {
        let (tx, rx) = channel::unbounded();

        let mut builder = self.walk_builder();
        let threads = self.config.effective_threads();
        if threads > 0 {
            builder.threads(threads);
        }

        let cancelled = cancellation.shared();
        builder.build_parallel().run(|| {
            let tx = tx.clone();
            let cancelled = Arc::clone(&cancelled);
            Box::new(move |entry| {
                if cancelled.load(Ordering::Relaxed) {
                    return WalkState::Quit;
                }
                match entry {
                    Ok(entry) if is_source_file(&entry) => {
                        let _ = tx.send(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(err) => log_walk_error(&err),
                }
                WalkState::Continue
            })
        });

        drop(tx);
        let mut files: Vec<PathBuf> = rx.into_iter().collect();
        // Sort for deterministic output
        files.sort();
        files
    }

    /// Directories down to `max_depth` that contain an `__init__.py`, sorted.
    ///
    /// A package nested inside another discovered package is left out.
    pub fn package_directories(&self, max_depth: usize) -> Vec<PathBuf> {
        let mut builder = self.walk_builder();
        builder.max_depth(Some(max_depth));

        let mut dirs: Vec<PathBuf> = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log_walk_error(&err);
                    continue;
                }
            };
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }
            if entry.path().join(PACKAGE_INIT_FILE).is_file() {
                dirs.push(entry.into_path());
            }
        }
        dirs.sort();

        let mut outermost: Vec<PathBuf> = Vec::new();
        for dir in dirs {
            if !outermost.iter().any(|parent| dir.starts_with(parent)) {
                outermost.push(dir);
            }
        }
        outermost
    }

    fn walk_builder(&self) -> WalkBuilder {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .hidden(self.config.exclude_hidden_paths)
            .follow_links(self.config.effective_follow_symlinks());

        if !self.excludes.is_empty() {
            builder.overrides(self.excludes.overrides());
        }
        builder
    }
}

/// Lazy sequence of source file paths produced by [`SourceScanner::files`].
pub struct SourceFiles {
    inner: ignore::Walk,
}

impl Iterator for SourceFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) if is_source_file(&entry) => return Some(entry.into_path()),
                Ok(_) => {}
                Err(err) => log_walk_error(&err),
            }
        }
    }
}

fn is_source_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_file())
        && entry
            .path()
            .extension()
            .is_some_and(|ext| ext == PYTHON_EXTENSION)
}

/// Walk errors never abort a scan: the offending subtree is skipped.
fn log_walk_error(err: &ignore::Error) {
    if is_symlink_loop(err) {
        tracing::warn!(error = %err, "symlink cycle detected, skipping subtree");
    } else {
        tracing::warn!(error = %err, "unreadable path, skipping");
    }
}

fn is_symlink_loop(err: &ignore::Error) -> bool {
    match err {
        ignore::Error::Loop { .. } => true,
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => is_symlink_loop(err),
        _ => false,
    }
}
