//! Line loop that applies the rewrite rules and tracks open blocks.

use crate::error::RewriteError;
use crate::{assertions, mocha, structure};
use respec_convert::ConversionConfig;
use std::path::Path;

/// What a rule decided for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rewrite {
    /// Replace the line body
    Replace(String),
    /// A spec helper require; only the first one is kept
    Helper(String),
    /// Remove the line
    Drop,
    /// Replace the line and append `close_suffix` to the `end` at the same indent
    OpenBlock {
        text: String,
        close_suffix: String,
        assertion: String,
    },
}

/// Where a rule is looking.
pub(crate) struct LineContext<'a> {
    pub path: &'a Path,
    pub line: usize,
    pub config: ConversionConfig,
}

pub(crate) type RuleResult = Result<Option<Rewrite>, RewriteError>;

type Rule = fn(&str, &LineContext<'_>) -> RuleResult;

/// Tried in order; the first rule that returns a rewrite wins.
const RULES: &[Rule] = &[
    structure::require,
    structure::test_case_class,
    structure::test_method,
    structure::hook,
    assertions::raises_block,
    assertions::raises_inline,
    mocha::expectation,
    assertions::assertion,
];

struct PendingBlock {
    indent: String,
    close_suffix: String,
    line: usize,
    assertion: String,
}

/// Rewrites a whole file.
pub fn rewrite(
    source: &str,
    path_hint: &Path,
    config: ConversionConfig,
) -> Result<String, RewriteError> {
    let mut out: Vec<String> = Vec::new();
    let mut pending: Vec<PendingBlock> = Vec::new();
    let mut helper_emitted = false;

    for (idx, raw) in source.lines().enumerate() {
        let body = raw.trim_start();
        let indent = &raw[..raw.len() - body.len()];

        if let Some(rest) = block_end(body) {
            if pending.last().is_some_and(|p| p.indent == indent) {
                if let Some(block) = pending.pop() {
                    out.push(format!("{indent}end{}{rest}", block.close_suffix));
                    continue;
                }
            }
        }

        let ctx = LineContext {
            path: path_hint,
            line: idx + 1,
            config,
        };
        let body = if config.use_mocha_dialect {
            mocha::doubles(body)
        } else {
            body.into()
        };

        let mut decision = None;
        for rule in RULES {
            if let Some(rewrite) = rule(&body, &ctx)? {
                decision = Some(rewrite);
                break;
            }
        }

        match decision {
            None => out.push(format!("{indent}{body}")),
            Some(Rewrite::Replace(text)) => out.push(format!("{indent}{text}")),
            Some(Rewrite::Helper(text)) => {
                if !helper_emitted {
                    helper_emitted = true;
                    out.push(format!("{indent}{text}"));
                }
            }
            Some(Rewrite::Drop) => {}
            Some(Rewrite::OpenBlock {
                text,
                close_suffix,
                assertion,
            }) => {
                out.push(format!("{indent}{text}"));
                pending.push(PendingBlock {
                    indent: indent.to_string(),
                    close_suffix,
                    line: ctx.line,
                    assertion,
                });
            }
        }
    }

    if let Some(block) = pending.pop() {
        return Err(RewriteError::UnterminatedBlock {
            path: path_hint.to_path_buf(),
            line: block.line,
            assertion: block.assertion,
        });
    }

    let mut text = out.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Returns the text after `end` when `body` closes a block, e.g. `" # done"`.
fn block_end(body: &str) -> Option<&str> {
    let rest = body.strip_prefix("end")?;
    let trimmed = rest.trim();
    (trimmed.is_empty() || trimmed.starts_with('#')).then_some(rest.trim_end())
}
