//! Mocha stubs and expectations to rspec-mocks.

use crate::args::{leading_group, parse_call, split_comment};
use crate::error::RewriteError;
use crate::rewriter::{LineContext, Rewrite, RuleResult};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static STUB_EVERYTHING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[=\s(,\[])stub_everything(\([^)]*\))?").expect("valid regex")
});

static DOUBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[=\s(,\[])(?:mock|stub)(\(|\s*$)").expect("valid regex")
});

static EXPECTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+?)\.(any_instance\.)?(stubs|expects)\b(.*)$").expect("valid regex")
});

static HASH_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=>|^\w+[?!]?:\s").expect("valid regex"));

/// Mocha modifier to rspec-mocks modifier, applied in order.
static CHAIN: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\.returns\(", ".and_return("),
        (r"\.raises\(", ".and_raise("),
        (r"\.yields\(", ".and_yield("),
        (r"\.times\(([^)]*)\)", ".exactly($1).times"),
        (r"\.at_least_once\b", ".at_least(:once)"),
        (r"\.at_most_once\b", ".at_most(:once)"),
        (r"\.at_least\((\d+)\)", ".at_least($1).times"),
        (r"\.at_most\((\d+)\)", ".at_most($1).times"),
        (r"\.in_sequence\([^)]*\)", ".ordered"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

static NEVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.never\b").expect("valid regex"));

/// Rewrites mocha test doubles (`mock`, `stub`, `stub_everything`) to
/// `double`. Lines without doubles are returned borrowed.
pub(crate) fn doubles(body: &str) -> Cow<'_, str> {
    let body = STUB_EVERYTHING.replace_all(body, "${1}double${2}.as_null_object");
    if DOUBLE.is_match(&body) {
        Cow::Owned(DOUBLE.replace_all(&body, "${1}double${2}").into_owned())
    } else {
        body
    }
}

/// `recv.stubs(...)` and `recv.expects(...)` with their modifier chain.
pub(crate) fn expectation(body: &str, ctx: &LineContext<'_>) -> RuleResult {
    if !ctx.config.use_mocha_dialect {
        return Ok(None);
    }
    let Some(caps) = EXPECTATION.captures(body) else {
        return Ok(None);
    };
    let receiver = &caps[1];
    let any_instance = caps.get(2).is_some();
    let verb = &caps[3];
    let unbalanced = || RewriteError::UnbalancedArguments {
        path: ctx.path.to_path_buf(),
        line: ctx.line,
        assertion: verb.to_string(),
    };

    let (rest, comment) = split_comment(&caps[4]).ok_or_else(unbalanced)?;
    let (args, chain) = if rest.starts_with('(') {
        leading_group(rest).ok_or_else(unbalanced)?
    } else if rest.starts_with(char::is_whitespace) {
        (rest.trim(), "")
    } else {
        ("", rest)
    };
    let call = parse_call(args).ok_or_else(unbalanced)?;
    if call.args.is_empty() {
        return Err(RewriteError::TooFewArguments {
            path: ctx.path.to_path_buf(),
            line: ctx.line,
            assertion: verb.to_string(),
            expected: 1,
            found: 0,
        });
    }

    let mut chain = chain.to_string();
    for (pattern, replacement) in CHAIN.iter() {
        chain = pattern.replace_all(&chain, *replacement).into_owned();
    }
    let never = NEVER.is_match(&chain);
    if never {
        chain = NEVER.replace_all(&chain, "").into_owned();
    }

    let verb_prefix = if verb == "expects" || never {
        "expect"
    } else {
        "allow"
    };
    let target = if any_instance {
        format!("{verb_prefix}_any_instance_of({receiver})")
    } else {
        format!("{verb_prefix}({receiver})")
    };
    let to = if never { "not_to" } else { "to" };
    let args = call.args.join(", ");
    let receive = if HASH_ARGS.is_match(&args) {
        "receive_messages"
    } else {
        "receive"
    };
    Ok(Some(Rewrite::Replace(format!(
        "{target}.{to} {receive}({args}){chain}{}{comment}",
        call.modifier
    ))))
}
