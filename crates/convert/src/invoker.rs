//! Seam between the orchestration core and the text conversion capability.

use crate::error::{ConvertError, Result};
use std::path::Path;

/// Feature flags handed to every conversion call of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionConfig {
    /// Translate mocha stubs and expectations (`--mocha`).
    pub use_mocha_dialect: bool,
    /// Emit Rails-style spec files (`--rails`).
    pub use_rails_conventions: bool,
}

#[cfg(test)]
use mockall::automock;

/// A capability that rewrites one test file's text into the target framework.
#[cfg_attr(test, automock)]
pub trait Converter: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Rewrites `source`. `path_hint` names the file for diagnostics only.
    fn convert(
        &self,
        source: &str,
        path_hint: &Path,
        config: ConversionConfig,
    ) -> anyhow::Result<String>;
}

/// Binds a [`Converter`] to the run's configuration.
pub struct ConversionInvoker<C: Converter> {
    converter: C,
    config: ConversionConfig,
}

impl<C: Converter> ConversionInvoker<C> {
    pub fn new(converter: C, config: ConversionConfig) -> Self {
        Self { converter, config }
    }

    pub fn converter_name(&self) -> &str {
        self.converter.name()
    }

    /// Converts `text`, reporting any capability failure as
    /// [`ConvertError::ContentConversion`] with the capability's message.
    pub fn convert(&self, text: &str, path_hint: &Path) -> Result<String> {
        self.converter
            .convert(text, path_hint, self.config)
            .map_err(|e| ConvertError::ContentConversion(e.to_string()))
    }
}
