//! Hash collections used across the workspace.
//!
//! Keys are short strings (tags, module segments) hashed on hot paths, so the
//! engine uses FxHash instead of SipHash.

pub use rustc_hash::{FxHashMap, FxHashSet};
