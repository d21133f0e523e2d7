//! Shared test utilities for respec crates.
//!
//! This crate provides temporary project trees laid out the way respec
//! expects (`test/` sources, `spec/` targets) and guards for tests that
//! touch process-global state.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = respec_test_utils::set_env_var("RESPEC_EXAMPLE", Some("1"));
/// assert_eq!(std::env::var("RESPEC_EXAMPLE").unwrap(), "1");
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// A minimal Test::Unit file used across tests.
pub const SAMPLE_TEST: &str = "\
require 'test_helper'

class BananaTest < Test::Unit::TestCase
  def test_is_yellow
    assert_equal :yellow, Banana.new.color
  end
end
";

/// Temporary project root with `test/` and `spec/` conventions.
///
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
}

impl TestFixture {
    /// Create an empty project root.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            tempdir: tempfile::tempdir()?,
        })
    }

    /// The project root; run the binary with this as its working directory.
    pub fn root(&self) -> &Path {
        self.tempdir.path()
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> std::io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Read `rel` back as a string.
    pub fn read(&self, rel: &str) -> std::io::Result<String> {
        std::fs::read_to_string(self.path(rel))
    }

    /// Returns true if `rel` exists inside the project.
    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }
}
