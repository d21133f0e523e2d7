//! Entry point for the `respec` binary.
//!
//! Parses arguments, resolves [`config::Settings`], runs the
//! [`BatchOrchestrator`] with the built-in [`RspecConverter`], and maps the
//! outcome to a process exit code.

#![deny(unsafe_code)]

pub mod cli;
pub mod config;

use clap::Parser;
use respec_convert::{
    BatchOrchestrator, Console, ConversionInvoker, EXIT_BATCH_FAILURES, EXIT_USAGE,
};
use respec_rewrite::RspecConverter;
use std::io::Write;
use std::process::ExitCode;

pub use cli::Cli;
pub use config::Settings;

/// The main entry point for the `respec` application.
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version arrive here too and are not failures.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let settings = Settings::load(&cli);
    ExitCode::from(execute(&cli, settings, &mut Console::stdio()))
}

/// Runs one invocation and returns its exit status.
pub fn execute<O: Write, E: Write>(
    cli: &Cli,
    settings: Settings,
    console: &mut Console<O, E>,
) -> u8 {
    tracing::debug!(
        source = %cli.source.display(),
        rails = settings.rails,
        mocha = settings.mocha,
        strict_batch = settings.strict_batch,
        "Starting conversion"
    );
    let orchestrator = BatchOrchestrator::new(ConversionInvoker::new(
        RspecConverter,
        settings.conversion_config(),
    ));
    match orchestrator.run(&cli.source, cli.target.as_deref(), console) {
        Ok(report) if settings.strict_batch && report.has_failures() => EXIT_BATCH_FAILURES,
        Ok(_) => 0,
        Err(err) => {
            tracing::debug!(kind = err.kind(), "Run failed");
            err.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use respec_convert::{
        EXIT_CONVERSION_FAILED, EXIT_SOURCE_NOT_FOUND, EXIT_TARGET_DIR_UNCREATABLE,
        EXIT_TARGET_EXISTS,
    };
    use respec_test_utils::{TestFixture, SAMPLE_TEST};
    use std::path::PathBuf;

    fn cli(source: PathBuf, target: Option<PathBuf>) -> Cli {
        Cli {
            rails: false,
            mocha: false,
            source,
            target,
        }
    }

    fn run_quiet(cli: &Cli, settings: Settings) -> (u8, String, String) {
        let mut console = Console::new(Vec::new(), Vec::new());
        let code = execute(cli, settings, &mut console);
        let (out, err) = console.into_parts();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn single_file_success() {
        let fx = TestFixture::new().unwrap();
        let source = fx.write("test/banana_test.rb", SAMPLE_TEST).unwrap();
        let target = fx.path("spec/banana_spec.rb");

        let (code, out, err) =
            run_quiet(&cli(source.clone(), Some(target.clone())), Settings::default());

        assert_eq!(code, 0);
        assert_eq!(
            out,
            format!("Converting {} to {}\n", source.display(), target.display())
        );
        assert!(err.is_empty());
        assert!(fx.read("spec/banana_spec.rb").unwrap().contains("describe Banana do"));
    }

    #[test]
    fn single_file_failures_map_to_their_codes() {
        let fx = TestFixture::new().unwrap();
        let source = fx.write("test/banana_test.rb", SAMPLE_TEST).unwrap();
        let broken = fx.write("test/broken_test.rb", "assert_equal 1\n").unwrap();
        fx.write("spec/taken_spec.rb", "keep me").unwrap();
        fx.write("blocker", "a file, not a directory").unwrap();

        let cases = [
            (fx.path("test/missing_test.rb"), None, EXIT_SOURCE_NOT_FOUND),
            (source.clone(), Some(fx.path("spec/taken_spec.rb")), EXIT_TARGET_EXISTS),
            (broken, Some(fx.path("spec/broken_spec.rb")), EXIT_CONVERSION_FAILED),
            (source, Some(fx.path("blocker/banana_spec.rb")), EXIT_TARGET_DIR_UNCREATABLE),
        ];
        for (source, target, expected) in cases {
            let (code, _, err) = run_quiet(&cli(source, target), Settings::default());
            assert_eq!(code, expected);
            assert!(err.starts_with("ERROR: Failed to convert: "), "{err}");
        }
        assert_eq!(fx.read("spec/taken_spec.rb").unwrap(), "keep me");
    }

    #[test]
    fn directory_failures_only_fail_strict_runs() {
        let fx = TestFixture::new().unwrap();
        fx.write("test/a_test.rb", SAMPLE_TEST).unwrap();
        fx.write("test/b_test.rb", "assert_equal 1\n").unwrap();
        let dir = cli(fx.path("test"), None);

        let (code, out, err) = run_quiet(&dir, Settings::default());
        assert_eq!(code, 0);
        assert_eq!(out.lines().count(), 2);
        assert_eq!(err.lines().count(), 1);

        std::fs::remove_file(fx.path("test/a_spec.rb")).unwrap();
        let strict = Settings {
            strict_batch: true,
            ..Settings::default()
        };
        let (code, _, _) = run_quiet(&dir, strict);
        assert_eq!(code, EXIT_BATCH_FAILURES);
    }

    #[test]
    fn strict_directory_run_without_failures_succeeds() {
        let fx = TestFixture::new().unwrap();
        fx.write("test/a_test.rb", SAMPLE_TEST).unwrap();
        let strict = Settings {
            strict_batch: true,
            ..Settings::default()
        };
        let (code, _, err) = run_quiet(&cli(fx.path("test"), None), strict);
        assert_eq!(code, 0);
        assert!(err.is_empty());
    }
}
