//! Filesystem preconditions for a single conversion.

use crate::error::{ConvertError, Result};
use std::fs;
use std::path::Path;

/// Fails with [`ConvertError::SourceNotFound`] unless `path` exists.
pub fn assert_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConvertError::SourceNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Fails with [`ConvertError::TargetAlreadyExists`] if `path` exists.
///
/// A dangling symlink counts as existing: writing through it would still
/// clobber whatever it later points at.
pub fn assert_absent(path: &Path) -> Result<()> {
    if path.symlink_metadata().is_ok() {
        Err(ConvertError::TargetAlreadyExists {
            path: path.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// Creates the parent directory of `path` and any missing ancestors.
///
/// A path without a parent component (a bare file name) needs nothing.
pub fn ensure_directory(path: &Path) -> Result<()> {
    let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.is_dir() {
        return Ok(());
    }
    tracing::debug!(dir = %dir.display(), "Creating target directory");
    fs::create_dir_all(dir).map_err(|source| ConvertError::TargetDirUncreatable {
        dir: dir.to_path_buf(),
        source,
    })
}
