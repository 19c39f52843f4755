//! Parser output types.

/// One imported path as written in source.
///
/// `path` is absolute (`a.b.c`) or relative with its leading dots kept
/// (`.sibling.name`, `..name`). `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawImport {
    pub path: String,
    pub line: u32,
}

impl RawImport {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Number of leading dots. 0 for absolute imports.
    pub fn relative_level(&self) -> usize {
        self.path.chars().take_while(|c| *c == '.').count()
    }

    pub fn is_relative(&self) -> bool {
        self.relative_level() > 0
    }
}
