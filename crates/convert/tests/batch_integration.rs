//! Directory-mode runs over real temp trees with a simple converter.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use respec_convert::{
    BatchOrchestrator, Console, ConversionConfig, ConversionInvoker, ConvertError, Converter,
    WorkItem,
};
use respec_test_utils::{TestFixture, SAMPLE_TEST};

/// Prefixes each file with its flags; rejects files containing `reject`.
struct Tagging;

impl Converter for Tagging {
    fn name(&self) -> &str {
        "tagging"
    }

    fn convert(&self, source: &str, path_hint: &Path, config: ConversionConfig) -> Result<String> {
        if source.contains("reject") {
            bail!("{}: unsupported construct", path_hint.display());
        }
        Ok(format!(
            "# mocha={} rails={}\n{}",
            config.use_mocha_dialect, config.use_rails_conventions, source
        ))
    }
}

fn orchestrator(config: ConversionConfig) -> BatchOrchestrator<Tagging> {
    BatchOrchestrator::new(ConversionInvoker::new(Tagging, config))
}

fn stream_lines(buf: Vec<u8>) -> Vec<String> {
    String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn directory_run_converts_nested_tree() -> Result<()> {
    let fx = TestFixture::new()?;
    fx.write("test/models/user_test.rb", SAMPLE_TEST)?;
    fx.write("test/fruit/banana_test.rb", SAMPLE_TEST)?;
    fx.write("test/test_helper.rb", "require 'minitest'")?;

    let mut console = Console::new(Vec::new(), Vec::new());
    let report = orchestrator(ConversionConfig::default()).run(
        &fx.path("test"),
        None,
        &mut console,
    )?;

    assert_eq!(report.converted.len(), 2);
    assert!(!report.has_failures());
    assert!(fx.exists("test/models/user_spec.rb"));
    assert!(fx.exists("test/fruit/banana_spec.rb"));
    assert!(!fx.exists("test/test_helper_spec.rb"));

    let (out, err) = console.into_parts();
    let out = stream_lines(out);
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("Converting "));
    assert!(out[0].ends_with("fruit/banana_spec.rb"));
    assert!(err.is_empty());
    Ok(())
}

#[test]
fn directory_run_continues_past_failures() -> Result<()> {
    let fx = TestFixture::new()?;
    fx.write("test/a_test.rb", "reject me")?;
    fx.write("test/b_test.rb", SAMPLE_TEST)?;
    fx.write("test/b_spec.rb", "hand edited spec")?;
    fx.write("test/c_test.rb", SAMPLE_TEST)?;

    let mut console = Console::new(Vec::new(), Vec::new());
    let report = orchestrator(ConversionConfig::default()).run(
        &fx.path("test"),
        None,
        &mut console,
    )?;

    assert_eq!(report.total(), 3);
    assert_eq!(report.converted, vec![WorkItem::inferred(fx.path("test/c_test.rb"))]);
    assert!(matches!(
        report.failed[0].error,
        ConvertError::ContentConversion(_)
    ));
    assert!(matches!(
        report.failed[1].error,
        ConvertError::TargetAlreadyExists { .. }
    ));

    assert!(!fx.exists("test/a_spec.rb"));
    assert_eq!(fx.read("test/b_spec.rb")?, "hand edited spec");

    let (_, err) = console.into_parts();
    let err = stream_lines(err);
    assert_eq!(err.len(), 2);
    assert!(err[0].ends_with("a_test.rb: unsupported construct"));
    Ok(())
}

#[test]
fn flags_reach_every_file_in_batch() -> Result<()> {
    let fx = TestFixture::new()?;
    for name in ["one", "two", "three"] {
        fx.write(&format!("test/{name}_test.rb"), SAMPLE_TEST)?;
    }
    let config = ConversionConfig {
        use_mocha_dialect: true,
        use_rails_conventions: true,
    };

    let report = orchestrator(config).run(
        &fx.path("test"),
        None,
        &mut Console::new(Vec::new(), Vec::new()),
    )?;

    assert_eq!(report.converted.len(), 3);
    for name in ["one", "two", "three"] {
        let spec = fx.read(&format!("test/{name}_spec.rb"))?;
        assert!(spec.starts_with("# mocha=true rails=true\n"), "{name}: {spec}");
    }
    Ok(())
}

#[test]
fn second_directory_run_changes_nothing() -> Result<()> {
    let fx = TestFixture::new()?;
    fx.write("test/a_test.rb", SAMPLE_TEST)?;
    let orch = orchestrator(ConversionConfig::default());

    orch.run(&fx.path("test"), None, &mut Console::new(Vec::new(), Vec::new()))?;
    let first = fs::read(fx.path("test/a_spec.rb"))?;

    let report = orch.run(
        &fx.path("test"),
        None,
        &mut Console::new(Vec::new(), Vec::new()),
    )?;
    assert_eq!(report.converted.len(), 0);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(fs::read(fx.path("test/a_spec.rb"))?, first);
    Ok(())
}

#[test]
fn explicit_target_is_ignored_for_directories() -> Result<()> {
    let fx = TestFixture::new()?;
    fx.write("test/a_test.rb", SAMPLE_TEST)?;

    let report = orchestrator(ConversionConfig::default()).run(
        &fx.path("test"),
        Some(&fx.path("elsewhere/out.rb")),
        &mut Console::new(Vec::new(), Vec::new()),
    )?;

    assert_eq!(report.converted.len(), 1);
    assert!(!fx.exists("elsewhere"));
    Ok(())
}
