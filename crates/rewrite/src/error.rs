//! Content-level rewrite failures.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a test file cannot be rewritten.
///
/// Every message starts with `path:line:` so it can be reported as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// An assertion was called with fewer arguments than it needs.
    #[error(
        "{}:{line}: {assertion} expects at least {expected} argument(s), found {found}",
        .path.display()
    )]
    TooFewArguments {
        path: PathBuf,
        line: usize,
        assertion: String,
        expected: usize,
        found: usize,
    },

    /// Brackets or quotes in an assertion's argument list do not balance on
    /// its line (multi-line argument lists are not supported).
    #[error(
        "{}:{line}: unbalanced brackets or quotes in {assertion} arguments",
        .path.display()
    )]
    UnbalancedArguments {
        path: PathBuf,
        line: usize,
        assertion: String,
    },

    /// A `do` block opened by an exception assertion has no matching `end`.
    #[error("{}:{line}: {assertion} block is never closed", .path.display())]
    UnterminatedBlock {
        path: PathBuf,
        line: usize,
        assertion: String,
    },
}
