//! Dotted module paths as segment vectors.

use std::fmt;
use std::path::{Component, Path};

use smallvec::SmallVec;
use tach_core::constants::PYTHON_EXTENSION;

const INIT_MODULE: &str = "__init__";

/// A fully-qualified dotted module path, e.g. `core.service.run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(SmallVec<[String; 4]>);

impl ModulePath {
    /// Split a dotted path. Empty segments are dropped.
    pub fn from_dotted(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Module path of a source file given relative to the project root:
    /// `core/service.py` is `core.service`, `core/__init__.py` is `core`.
    ///
    /// Returns `None` for absolute paths or paths leaving the root.
    pub fn from_file(relative: &Path) -> Option<Self> {
        let mut segments: SmallVec<[String; 4]> = SmallVec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        let last = segments.pop()?;
        let stem = last
            .strip_suffix(PYTHON_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&last);
        if stem != INIT_MODULE {
            segments.push(stem.to_string());
        }
        Some(Self(segments))
    }

    /// Module path of a package root as written in the policy file:
    /// `src/core` is `src.core`, `utils.py` is `utils`.
    pub fn from_package_root(root: &str) -> Option<Self> {
        let normalized = root.trim().replace('\\', "/");
        let path = Path::new(normalized.trim_end_matches('/'));
        Self::from_file(path).filter(|p| !p.is_empty())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segment-wise prefix test: `core` is a prefix of `core.x`, not of `core_utils`.
    pub fn starts_with(&self, prefix: &ModulePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The segments after `prefix`, or `None` if `prefix` does not match.
    pub fn strip_prefix(&self, prefix: &ModulePath) -> Option<ModulePath> {
        self.0
            .strip_prefix(prefix.0.as_slice())
            .map(|rest| ModulePath(rest.iter().cloned().collect()))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Turn a relative import into an absolute module path.
///
/// `package_dir` holds the directory segments of the importing file. One dot
/// means that directory, each extra dot goes one level up. Returns `None`
/// when the import climbs above the project root or names nothing.
pub fn resolve_relative(package_dir: &[String], import: &str) -> Option<ModulePath> {
    let level = import.chars().take_while(|c| *c == '.').count();
    if level == 0 {
        let absolute = ModulePath::from_dotted(import);
        return (!absolute.is_empty()).then_some(absolute);
    }

    let keep = package_dir.len().checked_sub(level - 1)?;
    let mut segments: SmallVec<[String; 4]> = package_dir[..keep].iter().cloned().collect();
    segments.extend(
        import[level..]
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    );
    (!segments.is_empty()).then(|| ModulePath(segments))
}
