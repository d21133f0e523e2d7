//! Test::Unit and Minitest assertions to RSpec expectations.

use crate::args::{parse_call, CallArgs};
use crate::error::RewriteError;
use crate::rewriter::{LineContext, Rewrite, RuleResult};
use regex::Regex;
use std::sync::LazyLock;

static ASSERTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:assert|refute)(?:_[a-z_]+)?)(\(.*|\s.*)?$").expect("valid regex")
});

static RAISES_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(assert_raises?|assert_nothing_raised)(.*?)\s*\bdo(?:\s*\|[^|]*\|)?\s*(#.*)?$")
        .expect("valid regex")
});

static RAISES_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(assert_raises?|assert_nothing_raised)\s*(\([^)]*\))?\s*\{(?:\s*\|[^|]*\|)?\s*(.*?)\s*\}\s*(#.*)?$",
    )
    .expect("valid regex")
});

/// Default tolerance Minitest uses for `assert_in_delta`.
const DEFAULT_DELTA: &str = "0.001";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    Truthy,
    Eq,
    Same,
    Nil,
    Include,
    Match,
    KindOf,
    InstanceOf,
    Empty,
    RespondTo,
    InDelta,
    Operator,
    Predicate,
}

/// Assertion name, matcher, and whether it asserts the negation.
const ASSERTIONS: &[(&str, Matcher, bool)] = &[
    ("assert", Matcher::Truthy, false),
    ("refute", Matcher::Truthy, true),
    ("assert_not", Matcher::Truthy, true),
    ("assert_equal", Matcher::Eq, false),
    ("assert_not_equal", Matcher::Eq, true),
    ("refute_equal", Matcher::Eq, true),
    ("assert_same", Matcher::Same, false),
    ("assert_not_same", Matcher::Same, true),
    ("refute_same", Matcher::Same, true),
    ("assert_nil", Matcher::Nil, false),
    ("assert_not_nil", Matcher::Nil, true),
    ("refute_nil", Matcher::Nil, true),
    ("assert_includes", Matcher::Include, false),
    ("assert_not_includes", Matcher::Include, true),
    ("refute_includes", Matcher::Include, true),
    ("assert_match", Matcher::Match, false),
    ("assert_no_match", Matcher::Match, true),
    ("assert_not_match", Matcher::Match, true),
    ("refute_match", Matcher::Match, true),
    ("assert_kind_of", Matcher::KindOf, false),
    ("refute_kind_of", Matcher::KindOf, true),
    ("assert_instance_of", Matcher::InstanceOf, false),
    ("refute_instance_of", Matcher::InstanceOf, true),
    ("assert_empty", Matcher::Empty, false),
    ("assert_not_empty", Matcher::Empty, true),
    ("refute_empty", Matcher::Empty, true),
    ("assert_respond_to", Matcher::RespondTo, false),
    ("refute_respond_to", Matcher::RespondTo, true),
    ("assert_in_delta", Matcher::InDelta, false),
    ("refute_in_delta", Matcher::InDelta, true),
    ("assert_operator", Matcher::Operator, false),
    ("refute_operator", Matcher::Operator, true),
    ("assert_predicate", Matcher::Predicate, false),
    ("refute_predicate", Matcher::Predicate, true),
];

impl Matcher {
    fn min_args(self) -> usize {
        match self {
            Self::Truthy | Self::Nil | Self::Empty => 1,
            Self::Operator => 3,
            _ => 2,
        }
    }

    /// Builds the expectation; `a` holds at least `min_args` entries.
    fn build(self, a: &[String], negated: bool) -> String {
        let to = if negated { "not_to" } else { "to" };
        match self {
            Self::Truthy if negated => format!("expect({}).to be_falsey", a[0]),
            Self::Truthy => format!("expect({}).to be_truthy", a[0]),
            Self::Eq if a[0] == "nil" => format!("expect({}).{to} be_nil", a[1]),
            Self::Eq => format!("expect({}).{to} eq({})", a[1], a[0]),
            Self::Same => format!("expect({}).{to} be({})", a[1], a[0]),
            Self::Nil => format!("expect({}).{to} be_nil", a[0]),
            Self::Include => format!("expect({}).{to} include({})", a[0], a[1]),
            Self::Match => format!("expect({}).{to} match({})", a[1], a[0]),
            Self::KindOf => format!("expect({}).{to} be_a_kind_of({})", a[1], a[0]),
            Self::InstanceOf => format!("expect({}).{to} be_an_instance_of({})", a[1], a[0]),
            Self::Empty => format!("expect({}).{to} be_empty", a[0]),
            Self::RespondTo => format!("expect({}).{to} respond_to({})", a[0], a[1]),
            Self::InDelta => {
                let delta = a.get(2).map(String::as_str).unwrap_or(DEFAULT_DELTA);
                format!("expect({}).{to} be_within({delta}).of({})", a[1], a[0])
            }
            Self::Operator => {
                let op = a[1].trim_start_matches(':');
                format!("expect({}).{to} be {op} {}", a[0], a[2])
            }
            Self::Predicate => {
                let predicate = a[1].trim_start_matches(':').trim_end_matches('?');
                format!("expect({}).{to} be_{predicate}", a[0])
            }
        }
    }
}

fn parse_args(
    rest: &str,
    assertion: &str,
    ctx: &LineContext<'_>,
) -> Result<CallArgs, RewriteError> {
    parse_call(rest).ok_or_else(|| RewriteError::UnbalancedArguments {
        path: ctx.path.to_path_buf(),
        line: ctx.line,
        assertion: assertion.to_string(),
    })
}

/// Picks the exception class out of `assert_raises` arguments, skipping a
/// trailing failure message.
fn raise_matcher(name: &str, args: &[String]) -> String {
    if name == "assert_nothing_raised" {
        return "not_to raise_error".to_string();
    }
    let classes: Vec<&String> = args
        .iter()
        .filter(|a| !a.starts_with('"') && !a.starts_with('\''))
        .collect();
    if classes.len() > 1 {
        tracing::debug!(
            classes = classes.len(),
            "Multiple exception classes; expecting the first"
        );
    }
    match classes.first() {
        Some(class) => format!("to raise_error({class})"),
        None => "to raise_error".to_string(),
    }
}

/// `assert_raises(Error) do` opens `expect do` and closes with
/// `end.to raise_error(Error)`.
pub(crate) fn raises_block(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    let Some(caps) = RAISES_BLOCK.captures(body) else {
        return Ok(None);
    };
    let name = &caps[1];
    let call = parse_args(&caps[2], name, ctx)?;
    let text = match caps.get(3) {
        Some(comment) => format!("expect do {}", comment.as_str()),
        None => "expect do".to_string(),
    };
    Ok(Some(Rewrite::OpenBlock {
        text,
        close_suffix: format!(".{}", raise_matcher(name, &call.args)),
        assertion: name.to_string(),
    }))
}

/// `assert_raises(Error) { boom }` on one line.
pub(crate) fn raises_inline(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    let Some(caps) = RAISES_INLINE.captures(body) else {
        return Ok(None);
    };
    let name = &caps[1];
    let args = match caps.get(2) {
        Some(group) => parse_args(group.as_str(), name, ctx)?.args,
        None => Vec::new(),
    };
    let mut text = format!("expect {{ {} }}.{}", &caps[3], raise_matcher(name, &args));
    if let Some(comment) = caps.get(4) {
        text.push(' ');
        text.push_str(comment.as_str());
    }
    Ok(Some(Rewrite::Replace(text)))
}

/// Any other known assertion on a single line.
pub(crate) fn assertion(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    let Some(caps) = ASSERTION.captures(body) else {
        return Ok(None);
    };
    let name = &caps[1];
    let rest = caps.get(2).map_or("", |m| m.as_str());
    // `assert = x` or `assert_count += 1` is an assignment, not a call.
    let after = rest.trim_start();
    if (after.starts_with('=') && !after.starts_with("==")) || after.starts_with("+=") {
        return Ok(None);
    }
    let Some(&(_, matcher, negated)) = ASSERTIONS.iter().find(|(n, _, _)| *n == name) else {
        tracing::debug!(assertion = name, line = ctx.line, "Unknown assertion left as-is");
        return Ok(None);
    };

    let call = parse_args(rest, name, ctx)?;
    if call.args.len() < matcher.min_args() {
        return Err(RewriteError::TooFewArguments {
            path: ctx.path.to_path_buf(),
            line: ctx.line,
            assertion: name.to_string(),
            expected: matcher.min_args(),
            found: call.args.len(),
        });
    }
    Ok(Some(Rewrite::Replace(format!(
        "{}{}{}",
        matcher.build(&call.args, negated),
        call.modifier,
        call.comment
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use respec_convert::ConversionConfig;
    use std::path::Path;

    fn ctx() -> LineContext<'static> {
        LineContext {
            path: Path::new("test/fruit/banana_test.rb"),
            line: 7,
            config: ConversionConfig::default(),
        }
    }

    fn convert(line: &str) -> String {
        match assertion(line, &ctx()).unwrap() {
            Some(Rewrite::Replace(text)) => text,
            other => panic!("expected replacement for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn equality() {
        assert_eq!(convert("assert_equal 3, basket.size"), "expect(basket.size).to eq(3)");
        assert_eq!(
            convert("assert_equal(:yellow, banana.color)"),
            "expect(banana.color).to eq(:yellow)"
        );
        assert_eq!(
            convert("assert_equal 3, basket.size, 'three bananas'"),
            "expect(basket.size).to eq(3)"
        );
        assert_eq!(convert("refute_equal 0, basket.size"), "expect(basket.size).not_to eq(0)");
        assert_eq!(convert("assert_equal nil, banana.stem"), "expect(banana.stem).to be_nil");
    }

    #[test]
    fn truthiness() {
        assert_eq!(convert("assert banana.ripe?"), "expect(banana.ripe?).to be_truthy");
        assert_eq!(convert("assert(banana.ripe?)"), "expect(banana.ripe?).to be_truthy");
        assert_eq!(convert("refute banana.rotten?"), "expect(banana.rotten?).to be_falsey");
        assert_eq!(convert("assert_not banana.rotten?"), "expect(banana.rotten?).to be_falsey");
    }

    #[test]
    fn nil_and_empty() {
        assert_eq!(convert("assert_nil banana.stem"), "expect(banana.stem).to be_nil");
        assert_eq!(convert("refute_nil banana.peel"), "expect(banana.peel).not_to be_nil");
        assert_eq!(convert("assert_empty basket"), "expect(basket).to be_empty");
        assert_eq!(convert("refute_empty basket"), "expect(basket).not_to be_empty");
    }

    #[test]
    fn collections_and_types() {
        assert_eq!(
            convert("assert_includes basket, banana"),
            "expect(basket).to include(banana)"
        );
        assert_eq!(
            convert("assert_match /yel+ow/, banana.color.to_s"),
            "expect(banana.color.to_s).to match(/yel+ow/)"
        );
        assert_eq!(
            convert("assert_kind_of Fruit, banana"),
            "expect(banana).to be_a_kind_of(Fruit)"
        );
        assert_eq!(
            convert("assert_instance_of Banana, banana"),
            "expect(banana).to be_an_instance_of(Banana)"
        );
        assert_eq!(
            convert("assert_respond_to banana, :peel"),
            "expect(banana).to respond_to(:peel)"
        );
    }

    #[test]
    fn numeric_and_predicates() {
        assert_eq!(
            convert("assert_in_delta 1.5, banana.weight, 0.1"),
            "expect(banana.weight).to be_within(0.1).of(1.5)"
        );
        assert_eq!(
            convert("assert_in_delta 1.5, banana.weight"),
            "expect(banana.weight).to be_within(0.001).of(1.5)"
        );
        assert_eq!(
            convert("assert_operator basket.size, :>, 2"),
            "expect(basket.size).to be > 2"
        );
        assert_eq!(
            convert("assert_predicate banana, :ripe?"),
            "expect(banana).to be_ripe"
        );
    }

    #[test]
    fn trailing_comment_is_kept() {
        assert_eq!(
            convert("assert_equal 3, basket.size # after restock"),
            "expect(basket.size).to eq(3) # after restock"
        );
    }

    #[test]
    fn trailing_modifier_follows_the_expectation() {
        assert_eq!(
            convert("assert_equal 3, basket.size if ready"),
            "expect(basket.size).to eq(3) if ready"
        );
        assert_eq!(
            convert("assert_equal(1, x) unless y # flaky"),
            "expect(x).to eq(1) unless y # flaky"
        );
        assert_eq!(
            convert("refute banana.rotten? if banana"),
            "expect(banana.rotten?).to be_falsey if banana"
        );
    }

    #[test]
    fn regex_arguments_may_hold_brackets_and_quotes() {
        assert_eq!(
            convert(r"assert_match /\(/, line"),
            r"expect(line).to match(/\(/)"
        );
        assert_eq!(
            convert("assert_match /it's/, line"),
            "expect(line).to match(/it's/)"
        );
        assert_eq!(
            convert("assert_no_match %r{^[(]}, line"),
            "expect(line).not_to match(%r{^[(]})"
        );
    }

    #[test]
    fn assignments_and_unknown_assertions_are_left_alone() {
        assert_eq!(assertion("assert = true", &ctx()).unwrap(), None);
        assert_eq!(assertion("assert_count += 1", &ctx()).unwrap(), None);
        assert_eq!(assertion("assert_difference 'Banana.count' do", &ctx()).unwrap(), None);
        assert_eq!(assertion("assertion_helper", &ctx()).unwrap(), None);
    }

    #[test]
    fn too_few_arguments_is_reported_with_location() {
        let err = assertion("assert_equal 3", &ctx()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "test/fruit/banana_test.rb:7: assert_equal expects at least 2 argument(s), found 1"
        );
        assert!(assertion("assert", &ctx()).is_err());
    }

    #[test]
    fn unbalanced_arguments_are_reported() {
        let err = assertion("assert_equal [1, 2,", &ctx()).unwrap_err();
        assert!(matches!(err, RewriteError::UnbalancedArguments { line: 7, .. }));
    }

    fn close_suffix(open: Option<Rewrite>) -> String {
        match open {
            Some(Rewrite::OpenBlock { close_suffix, .. }) => close_suffix,
            other => panic!("expected an open block, got {other:?}"),
        }
    }

    #[test]
    fn raise_blocks() {
        let open = raises_block("assert_raises(ArgumentError) do", &ctx()).unwrap();
        assert_eq!(
            open,
            Some(Rewrite::OpenBlock {
                text: "expect do".into(),
                close_suffix: ".to raise_error(ArgumentError)".into(),
                assertion: "assert_raises".into(),
            })
        );

        let open = raises_block("assert_raise KeyError, 'missing key' do |e|", &ctx()).unwrap();
        assert_eq!(close_suffix(open), ".to raise_error(KeyError)");

        let open = raises_block("assert_nothing_raised do", &ctx()).unwrap();
        assert_eq!(close_suffix(open), ".not_to raise_error");
    }

    #[test]
    fn inline_raise() {
        assert_eq!(
            raises_inline("assert_raises(ZeroDivisionError) { 1 / 0 }", &ctx()).unwrap(),
            Some(Rewrite::Replace(
                "expect { 1 / 0 }.to raise_error(ZeroDivisionError)".into()
            ))
        );
        assert_eq!(
            raises_inline("assert_raises { banana.eat! }", &ctx()).unwrap(),
            Some(Rewrite::Replace("expect { banana.eat! }.to raise_error".into()))
        );
    }
}
