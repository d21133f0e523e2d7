//! Error kinds raised while converting a single work item.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a malformed invocation.
pub const EXIT_USAGE: u8 = 1;
/// Exit status when the top-level source file is missing.
pub const EXIT_SOURCE_NOT_FOUND: u8 = 2;
/// Exit status when the top-level target file already exists.
pub const EXIT_TARGET_EXISTS: u8 = 3;
/// Exit status when the conversion capability rejected the input.
pub const EXIT_CONVERSION_FAILED: u8 = 4;
/// Exit status when the target directory could not be created.
pub const EXIT_TARGET_DIR_UNCREATABLE: u8 = 5;
/// Exit status for a strict directory run with at least one failed item.
pub const EXIT_BATCH_FAILURES: u8 = 6;

/// Result alias used throughout the conversion pipeline.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting one source file.
///
/// Every variant is recoverable at the work-item boundary of a directory run
/// and fatal in single-file mode, where [`ConvertError::exit_code`] selects
/// the process status.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source path does not exist.
    #[error("Source file {} does not exist", .path.display())]
    SourceNotFound { path: PathBuf },

    /// The target path already exists and would be overwritten.
    #[error("Target file {} already exists", .path.display())]
    TargetAlreadyExists { path: PathBuf },

    /// The parent directory of the target could not be created.
    #[error("Could not create target directory {}: {source}", .dir.display())]
    TargetDirUncreatable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The conversion capability rejected the input. The message is the
    /// capability's own, unmodified.
    #[error("{0}")]
    ContentConversion(String),

    /// Reading the source or writing the target failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    /// Process exit status for this error when it ends a single-file run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::SourceNotFound { .. } => EXIT_SOURCE_NOT_FOUND,
            Self::TargetAlreadyExists { .. } => EXIT_TARGET_EXISTS,
            Self::ContentConversion(_) | Self::Io { .. } => EXIT_CONVERSION_FAILED,
            Self::TargetDirUncreatable { .. } => EXIT_TARGET_DIR_UNCREATABLE,
        }
    }

    /// Short machine-friendly label, used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "source_not_found",
            Self::TargetAlreadyExists { .. } => "target_already_exists",
            Self::TargetDirUncreatable { .. } => "target_dir_uncreatable",
            Self::ContentConversion(_) => "content_conversion",
            Self::Io { .. } => "io",
        }
    }
}
