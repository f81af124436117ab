//! Cross-cutting utility functions used by the CLI and I/O layers.
//!
//! Submodules:
//! - [`file_size`] — file size queries (`get_file_size`, `get_open_file_size`)
//!
//! The most commonly needed symbols are re-exported at the `util` module level.

use std::path::Path;

pub mod file_size;

pub use file_size::{get_file_size, get_open_file_size};

/// Returns `true` if both string slices are equal.
///
/// Equivalent to `a == b`; provided as a named function to give call-sites a
/// self-documenting label when comparing filenames or format identifiers.
pub fn same_string(a: &str, b: &str) -> bool {
    a == b
}

/// Returns `true` if `path` refers to an existing directory.
///
/// Used by `io::file_io` to reject directory arguments before attempting to
/// open them as a file.
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_string_equal_strings() {
        assert!(same_string("hello", "hello"));
    }

    #[test]
    fn same_string_unequal_strings() {
        assert!(!same_string("hello", "world"));
    }

    #[test]
    fn is_directory_true_for_dir_false_for_missing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(is_directory(dir.path()));
        assert!(!is_directory(&dir.path().join("does_not_exist")));
    }
}
