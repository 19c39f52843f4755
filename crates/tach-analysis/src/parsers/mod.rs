//! Parsers: tree-sitter based import extraction with a content-hash cache.

pub mod cache;
pub mod extractor;
pub mod python;
pub mod types;

pub use cache::ParseCache;
pub use extractor::ImportExtractor;
pub use types::RawImport;
