//! Source rewriting from Test::Unit and Minitest to RSpec.
//!
//! [`rewrite`] walks a test file line by line and applies a fixed table of
//! rules. Lines no rule recognizes pass through unchanged, so helper
//! methods and plain Ruby survive the conversion. Exception assertions that
//! open a `do` block are closed by the `end` at the same indentation.
//!
//! The mocha dialect (`stubs`, `expects`, `mock`) is only translated when
//! [`ConversionConfig::use_mocha_dialect`] is set, and Rails test case base
//! classes only gain an RSpec `type:` when
//! [`ConversionConfig::use_rails_conventions`] is set.
//!
//! ```
//! use respec_convert::ConversionConfig;
//! use std::path::Path;
//!
//! let spec = respec_rewrite::rewrite(
//!     "def test_is_ripe\n  assert banana.ripe?\nend\n",
//!     Path::new("test/banana_test.rb"),
//!     ConversionConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(spec, "it \"is ripe\" do\n  expect(banana.ripe?).to be_truthy\nend\n");
//! ```

#![deny(unsafe_code)]

mod args;
mod assertions;
pub mod error;
mod mocha;
mod rewriter;
mod structure;

pub use error::RewriteError;
pub use rewriter::rewrite;

use respec_convert::{ConversionConfig, Converter};
use std::path::Path;

/// The [`Converter`] the `respec` binary runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RspecConverter;

impl Converter for RspecConverter {
    fn name(&self) -> &str {
        "rspec"
    }

    fn convert(
        &self,
        source: &str,
        path_hint: &Path,
        config: ConversionConfig,
    ) -> anyhow::Result<String> {
        let converted = rewrite(source, path_hint, config)?;
        tracing::trace!(
            path = %path_hint.display(),
            lines = converted.lines().count(),
            "Rewrote test file"
        );
        Ok(converted)
    }
}
