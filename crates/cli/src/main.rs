//! Command-line interface for the `respec` application.
//!
//! This crate serves as the main entry point for the executable, delegating
//! its core functionality to the `respec-app` crate.

use std::process::ExitCode;

fn main() -> ExitCode {
    respec_app::run()
}
