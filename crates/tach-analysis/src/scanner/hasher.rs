//! Content hashing for the parse cache.

use xxhash_rust::xxh3::xxh3_64;

/// Hash file contents with xxh3.
pub fn hash_content(content: &[u8]) -> u64 {
    xxh3_64(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_hashes_equal() {
        assert_eq!(hash_content(b"import os\n"), hash_content(b"import os\n"));
        assert_ne!(hash_content(b"import os\n"), hash_content(b"import sys\n"));
    }
}
