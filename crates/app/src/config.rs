//! Configuration file support for respec.
//!
//! Settings resolve with the following precedence:
//! CLI flags > Environment variables > Config file > defaults
//!
//! A CLI flag can only switch an option on.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.respec/config.toml (or the path in RESPEC_CONFIG)
//!
//! [convert]
//! # Default for --rails
//! rails = false
//!
//! # Default for --mocha
//! mocha = true
//!
//! # Exit non-zero when any file in a directory run fails
//! strict_batch = false
//! ```

use crate::cli::Cli;
use anyhow::{Context, Result};
use respec_convert::ConversionConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "RESPEC_CONFIG";
pub const RAILS_ENV: &str = "RESPEC_RAILS";
pub const MOCHA_ENV: &str = "RESPEC_MOCHA";
pub const STRICT_BATCH_ENV: &str = "RESPEC_STRICT_BATCH";

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion defaults.
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// The `[convert]` table.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConvertConfig {
    pub rails: Option<bool>,
    pub mocha: Option<bool>,
    /// Exit with a failure status when any directory item fails.
    pub strict_batch: Option<bool>,
}

/// Returns the path to the config file (`~/.respec/config.toml`).
fn config_path() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|h| h.join(".respec").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if there is no file, and `Err` if it exists but cannot
/// be read or parsed.
pub fn load_config() -> Result<Option<Config>> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(None),
    }
}

/// Loads the configuration at `path`; a missing file is `Ok(None)`.
pub fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(
        target: "respec::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Reads a boolean switch: `1`/`true` enable, `0`/`false` disable.
///
/// Unset or unrecognized values yield `None`.
pub fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim() {
        "1" => Some(true),
        "0" => Some(false),
        v if v.eq_ignore_ascii_case("true") => Some(true),
        v if v.eq_ignore_ascii_case("false") => Some(false),
        other => {
            tracing::warn!(
                target: "respec::config",
                key,
                value = other,
                "Ignoring unrecognized boolean"
            );
            None
        }
    }
}

/// Effective settings for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub rails: bool,
    pub mocha: bool,
    pub strict_batch: bool,
}

impl Settings {
    /// Merges CLI flags over the environment over the config file.
    pub fn resolve(cli: &Cli, file: &ConvertConfig) -> Self {
        let layered = |flag: bool, key: &str, from_file: Option<bool>| {
            flag || env_flag(key).or(from_file).unwrap_or(false)
        };
        Self {
            rails: layered(cli.rails, RAILS_ENV, file.rails),
            mocha: layered(cli.mocha, MOCHA_ENV, file.mocha),
            strict_batch: layered(false, STRICT_BATCH_ENV, file.strict_batch),
        }
    }

    /// Loads the config file and resolves against `cli`.
    ///
    /// A config file that cannot be read is reported and ignored.
    pub fn load(cli: &Cli) -> Self {
        let file = match load_config() {
            Ok(config) => config.unwrap_or_default().convert,
            Err(e) => {
                tracing::warn!(
                    target: "respec::config",
                    error = format!("{e:#}"),
                    "Ignoring configuration file"
                );
                ConvertConfig::default()
            }
        };
        Self::resolve(cli, &file)
    }

    pub fn conversion_config(&self) -> ConversionConfig {
        ConversionConfig {
            use_mocha_dialect: self.mocha,
            use_rails_conventions: self.rails,
        }
    }
}
