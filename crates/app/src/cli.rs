use clap::Parser;
use std::path::PathBuf;

/// Command-line interface for the `respec` application.
#[derive(Debug, Parser)]
#[command(
    name = "respec",
    version,
    about = "Converts Test::Unit and Minitest files into RSpec specs",
    long_about = "Converts Test::Unit and Minitest files into RSpec specs.\n\n\
        With a file SOURCE, writes one spec to TARGET (default: the path with a \
        leading `test` replaced by `spec` and `_test.rb` by `_spec.rb`). With a \
        directory SOURCE, converts every `*_test.rb` below it and keeps going \
        past files that fail. Existing targets are never overwritten."
)]
pub struct Cli {
    /// Emit Rails conventions (`rails_helper`, `RSpec.describe ..., type:`).
    /// Also enabled by `RESPEC_RAILS` or `[convert] rails` in the config file.
    #[arg(long, default_value_t = false)]
    pub rails: bool,
    /// Translate mocha stubs and expectations to rspec-mocks.
    /// Also enabled by `RESPEC_MOCHA` or `[convert] mocha` in the config file.
    #[arg(long, default_value_t = false)]
    pub mocha: bool,
    /// Test file or directory of test files to convert.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
    /// Output file for a single-file conversion (ignored for directories).
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,
}
