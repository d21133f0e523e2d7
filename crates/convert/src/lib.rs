//! Conversion orchestration for respec.
//!
//! Turns Test::Unit style test files into RSpec specs one file at a time or
//! across a directory tree. This crate owns everything except the text
//! rewriting itself:
//! - Inferring `spec/..._spec.rb` targets from `test/..._test.rb` sources.
//! - Refusing to overwrite existing targets and creating missing directories.
//! - Invoking a pluggable [`Converter`] with the run's [`ConversionConfig`].
//! - Isolating per-file failures in directory runs.
//!
//! # Examples
//!
//! ```
//! use respec_convert::{
//!     BatchOrchestrator, Console, ConversionConfig, ConversionInvoker, Converter,
//! };
//! use std::path::Path;
//! use tempfile::tempdir;
//!
//! struct Shout;
//!
//! impl Converter for Shout {
//!     fn name(&self) -> &str {
//!         "shout"
//!     }
//!
//!     fn convert(
//!         &self,
//!         source: &str,
//!         _path_hint: &Path,
//!         _config: ConversionConfig,
//!     ) -> anyhow::Result<String> {
//!         Ok(source.to_uppercase())
//!     }
//! }
//!
//! let tmp = tempdir().unwrap();
//! std::fs::write(tmp.path().join("apple_test.rb"), "assert true\n").unwrap();
//!
//! let orchestrator =
//!     BatchOrchestrator::new(ConversionInvoker::new(Shout, ConversionConfig::default()));
//! let mut console = Console::new(Vec::new(), Vec::new());
//! let report = orchestrator.run(tmp.path(), None, &mut console).unwrap();
//!
//! assert_eq!(report.converted.len(), 1);
//! assert_eq!(
//!     std::fs::read_to_string(tmp.path().join("apple_spec.rb")).unwrap(),
//!     "ASSERT TRUE\n"
//! );
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod guard;
pub mod invoker;
pub mod orchestrator;
pub mod paths;
pub mod report;

pub use error::{
    ConvertError, Result, EXIT_BATCH_FAILURES, EXIT_CONVERSION_FAILED, EXIT_SOURCE_NOT_FOUND,
    EXIT_TARGET_DIR_UNCREATABLE, EXIT_TARGET_EXISTS, EXIT_USAGE,
};
pub use guard::{assert_absent, assert_exists, ensure_directory};
pub use invoker::{ConversionConfig, ConversionInvoker, Converter};
pub use orchestrator::{discover_work_items, BatchOrchestrator, Console, RunMode, WorkItem};
pub use paths::{infer_target, infer_target_str, is_test_file};
pub use report::{BatchReport, ItemFailure};
