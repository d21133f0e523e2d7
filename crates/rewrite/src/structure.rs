//! File-level structure: requires, test case classes, test methods, hooks.

use crate::rewriter::{LineContext, Rewrite, RuleResult};
use regex::Regex;
use std::sync::LazyLock;

static HELPER_REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^require(?:_relative)?\b.*['"/](?:test_helper|test/unit|minitest/autorun|minitest/pride)(?:\.rb)?['"].*$"#,
    )
    .expect("valid regex")
});

static MOCHA_REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^require\s*\(?\s*['"]mocha(?:/[\w/]+)?['"]\s*\)?\s*$"#).expect("valid regex")
});

static TEST_CASE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class\s+([A-Z][\w:]*)\s*<\s*([A-Z][\w:]*)\s*(#.*)?$").expect("valid regex")
});

static TEST_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^def\s+test_(\w+[?!]?)\s*(?:\(\s*\))?\s*(#.*)?$").expect("valid regex")
});

static DECLARATIVE_TEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^test\s*\(?\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')\s*\)?\s*do\s*(#.*)?$"#,
    )
    .expect("valid regex")
});

static HOOK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:def\s+(setup|teardown)\s*(?:\(\s*\))?|(setup|teardown)\s+do)\s*(#.*)?$")
        .expect("valid regex")
});

/// Base classes recognized as test cases, with the spec type Rails infers.
const TEST_CASE_BASES: &[(&str, Option<&str>)] = &[
    ("Test::Unit::TestCase", None),
    ("Minitest::Test", None),
    ("MiniTest::Test", None),
    ("MiniTest::Unit::TestCase", None),
    ("Minitest::Unit::TestCase", None),
    ("ActiveSupport::TestCase", Some("model")),
    ("ActionController::TestCase", Some("controller")),
    ("ActionDispatch::IntegrationTest", Some("request")),
    ("ActionMailer::TestCase", Some("mailer")),
    ("ActionView::TestCase", Some("helper")),
    ("ActiveJob::TestCase", Some("job")),
];

fn with_comment(text: String, comment: Option<regex::Match<'_>>) -> String {
    match comment {
        Some(c) => format!("{text} {}", c.as_str()),
        None => text,
    }
}

/// `require 'test_helper'` and friends become the spec helper; mocha
/// requires are dropped when translating mocha.
pub(crate) fn require(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    if HELPER_REQUIRE.is_match(body) {
        let helper = if ctx.config.use_rails_conventions {
            "rails_helper"
        } else {
            "spec_helper"
        };
        return Ok(Some(Rewrite::Helper(format!("require '{helper}'"))));
    }
    if ctx.config.use_mocha_dialect && MOCHA_REQUIRE.is_match(body) {
        return Ok(Some(Rewrite::Drop));
    }
    Ok(None)
}

/// `class BananaTest < Test::Unit::TestCase` opens a describe block.
pub(crate) fn test_case_class(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    let Some(caps) = TEST_CASE_CLASS.captures(body) else {
        return Ok(None);
    };
    let Some(&(_, spec_type)) = TEST_CASE_BASES.iter().find(|(base, _)| *base == &caps[2]) else {
        return Ok(None);
    };
    let class = &caps[1];
    let subject = match class.strip_suffix("Test") {
        Some(stripped) if !stripped.is_empty() && !stripped.ends_with(':') => stripped,
        _ => class,
    };

    let text = match (ctx.config.use_rails_conventions, spec_type) {
        (true, Some(kind)) => format!("RSpec.describe {subject}, type: :{kind} do"),
        (true, None) => format!("RSpec.describe {subject} do"),
        (false, _) => format!("describe {subject} do"),
    };
    Ok(Some(Rewrite::Replace(with_comment(text, caps.get(3)))))
}

/// `def test_is_ripe` and `test "is ripe" do` become examples.
pub(crate) fn test_method(body: &str, _ctx: &LineContext<'_>) -> RuleResult {
    if let Some(caps) = TEST_METHOD.captures(body) {
        let description = caps[1].replace('_', " ");
        let text = format!("it \"{}\" do", description.trim());
        return Ok(Some(Rewrite::Replace(with_comment(text, caps.get(2)))));
    }
    if let Some(caps) = DECLARATIVE_TEST.captures(body) {
        let text = match (caps.get(1), caps.get(2)) {
            (Some(double), _) => format!("it \"{}\" do", double.as_str()),
            (None, Some(single)) => format!("it '{}' do", single.as_str()),
            (None, None) => return Ok(None),
        };
        return Ok(Some(Rewrite::Replace(with_comment(text, caps.get(3)))));
    }
    Ok(None)
}

/// `def setup` / `setup do` become `before do`; teardown becomes `after do`.
pub(crate) fn hook(body: &str, _ctx: &LineContext<'_>) -> RuleResult {
    let Some(caps) = HOOK.captures(body) else {
        return Ok(None);
    };
    let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
    let text = match name {
        Some("setup") => "before do",
        Some("teardown") => "after do",
        _ => return Ok(None),
    };
    Ok(Some(Rewrite::Replace(with_comment(
        text.to_string(),
        caps.get(3),
    ))))
}
