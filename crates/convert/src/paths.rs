//! Default target path inference.
//!
//! Sources live under `test/` and end in `_test.rb`; their specs live under
//! `spec/` and end in `_spec.rb`. Both substitutions are plain prefix/suffix
//! text replacements.

use std::path::{Path, PathBuf};

/// Leading segment of a source path.
pub const INPUT_ROOT: &str = "test";
/// Replacement for [`INPUT_ROOT`].
pub const OUTPUT_ROOT: &str = "spec";
/// Trailing marker of a convertible file name.
pub const INPUT_SUFFIX: &str = "_test.rb";
/// Replacement for [`INPUT_SUFFIX`].
pub const OUTPUT_SUFFIX: &str = "_spec.rb";

/// Maps a source path to its default target path.
///
/// Never fails: a path that does not start with [`INPUT_ROOT`] or end with
/// [`INPUT_SUFFIX`] keeps that part unchanged. Non-UTF-8 paths are returned
/// as-is.
///
/// ```
/// use respec_convert::infer_target;
/// use std::path::Path;
///
/// assert_eq!(
///     infer_target(Path::new("test/fruit/banana_test.rb")),
///     Path::new("spec/fruit/banana_spec.rb")
/// );
/// ```
pub fn infer_target(source: &Path) -> PathBuf {
    let Some(text) = source.to_str() else {
        return source.to_path_buf();
    };
    PathBuf::from(infer_target_str(text))
}

/// String form of [`infer_target`].
pub fn infer_target_str(source: &str) -> String {
    let rooted = match source.strip_prefix(INPUT_ROOT) {
        Some(rest) => format!("{OUTPUT_ROOT}{rest}"),
        None => source.to_owned(),
    };
    match rooted.strip_suffix(INPUT_SUFFIX) {
        Some(stem) => format!("{stem}{OUTPUT_SUFFIX}"),
        None => rooted,
    }
}

/// Returns true if the file name carries the input-file marker.
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(INPUT_SUFFIX))
}
