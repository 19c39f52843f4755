//! Scan pipeline: discover files, extract and resolve imports on a rayon
//! pool, and feed per-file outcomes to a single graph accumulator.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossbeam_channel as channel;
use rayon::prelude::*;
use tach_core::errors::{ParseError, ScanError};

use crate::graph::{DependencyGraph, DependencyGraphBuilder, ImportSite};
use crate::parsers::ImportExtractor;
use crate::resolver::{ModuleResolver, PackageId};
use crate::scanner::{ScanCancellation, SourceScanner};

/// Result of processing one source file.
#[derive(Debug)]
pub(crate) enum FileOutcome {
    Imports {
        package: PackageId,
        sites: Vec<ImportSite>,
    },
    Failed {
        file_path: PathBuf,
        error: ParseError,
    },
}

impl FileOutcome {
    fn record(self, builder: &mut DependencyGraphBuilder) {
        builder.mark_file_scanned();
        match self {
            Self::Imports { package, sites } => {
                for site in sites {
                    builder.add_site(package, site);
                }
            }
            Self::Failed { file_path, error } => builder.add_parse_error(file_path, &error),
        }
    }
}

pub(crate) struct Pipeline<'a> {
    pub scanner: &'a SourceScanner,
    pub resolver: &'a ModuleResolver,
    pub extractor: &'a ImportExtractor,
    pub cancellation: &'a ScanCancellation,
}

impl Pipeline<'_> {
    pub fn run(&self) -> Result<DependencyGraph, ScanError> {
        let start = Instant::now();
        let threads = self.scanner.config().effective_threads();

        let graph = if threads == 1 {
            self.run_sequential()?
        } else {
            self.run_parallel(threads)?
        };

        tracing::debug!(
            files = graph.files_scanned,
            edges = graph.edge_count(),
            issues = graph.structural_issues.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dependency graph built"
        );
        Ok(graph)
    }

    fn run_sequential(&self) -> Result<DependencyGraph, ScanError> {
        let mut builder = DependencyGraphBuilder::new();
        for path in self.scanner.files() {
            if self.cancellation.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            if let Some(outcome) = self.process_file(&path) {
                outcome.record(&mut builder);
            }
        }
        Ok(builder.build())
    }

    fn run_parallel(&self, threads: usize) -> Result<DependencyGraph, ScanError> {
        let files = self.scanner.collect_parallel(self.cancellation);
        if self.cancellation.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        tracing::debug!(files = files.len(), "source files discovered");

        let (tx, rx) = channel::unbounded::<FileOutcome>();
        let builder = std::thread::scope(|scope| {
            let accumulator = scope.spawn(move || {
                let mut builder = DependencyGraphBuilder::new();
                for outcome in rx {
                    outcome.record(&mut builder);
                }
                builder
            });

            let extract = || {
                files.par_iter().for_each_with(tx, |tx, path| {
                    if self.cancellation.is_cancelled() {
                        return;
                    }
                    if let Some(outcome) = self.process_file(path) {
                        let _ = tx.send(outcome);
                    }
                });
            };
            match build_pool(threads) {
                Some(pool) => pool.install(extract),
                None => extract(),
            }

            accumulator
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        });

        // Partial results are discarded
        if self.cancellation.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        Ok(builder.build())
    }

    /// Extract and resolve one file. `None` for files outside every package.
    fn process_file(&self, path: &Path) -> Option<FileOutcome> {
        let relative = path.strip_prefix(self.scanner.root()).unwrap_or(path);
        let source = self.resolver.source_module(relative)?;

        match self.extractor.extract_file(path) {
            Ok(imports) => {
                let sites = imports
                    .iter()
                    .map(|import| {
                        let resolved = self.resolver.resolve(&source, import);
                        ImportSite {
                            file_path: relative.to_path_buf(),
                            line_number: import.line,
                            import_mod_path: resolved.module_path,
                            target: resolved.target,
                        }
                    })
                    .collect();
                Some(FileOutcome::Imports {
                    package: source.package,
                    sites,
                })
            }
            Err(error) => {
                tracing::warn!(path = %relative.display(), error = %error, "file skipped");
                Some(FileOutcome::Failed {
                    file_path: relative.to_path_buf(),
                    error,
                })
            }
        }
    }
}

/// A dedicated pool when a thread count is configured, the global pool otherwise.
fn build_pool(threads: usize) -> Option<rayon::ThreadPool> {
    if threads == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            tracing::warn!(error = %err, threads, "thread pool unavailable, using global pool");
            None
        }
    }
}
