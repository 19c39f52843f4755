//! ImportExtractor: reads a file, consults the cache, runs the parser.

use std::path::Path;
use std::sync::Arc;

use tach_core::errors::ParseError;

use super::cache::ParseCache;
use super::python::extract_imports;
use super::types::RawImport;
use crate::scanner::hasher::hash_content;

/// Extracts imports from Python source, caching results by content.
///
/// Shared across worker threads; the cache is internally synchronized.
#[derive(Debug, Default)]
pub struct ImportExtractor {
    cache: ParseCache,
}

impl ImportExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract imports from in-memory source. `path` is only used in errors.
    pub fn extract(&self, source: &[u8], path: &Path) -> Result<Arc<[RawImport]>, ParseError> {
        let content_hash = hash_content(source);
        if let Some(cached) = self.cache.get(content_hash) {
            return Ok(cached);
        }

        let imports: Arc<[RawImport]> = extract_imports(source, path)?.into();
        self.cache.insert(content_hash, Arc::clone(&imports));
        Ok(imports)
    }

    /// Read `path` from disk and extract its imports.
    pub fn extract_file(&self, path: &Path) -> Result<Arc<[RawImport]>, ParseError> {
        let source = std::fs::read(path).map_err(|e| ParseError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.extract(&source, path)
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }
}
