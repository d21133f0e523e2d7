//! Splitting a Ruby call's argument list on a single line.

/// Arguments of one call, its statement modifier, and any trailing
/// `# comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgs {
    pub args: Vec<String>,
    /// A trailing `if`/`unless` with its leading whitespace, e.g. `" if ready"`.
    pub modifier: String,
    /// The comment including its leading whitespace, e.g. `"  # why"`.
    pub comment: String,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    idx: usize,
    ch: char,
    /// Nesting depth outside this character; a bracket pair shares it.
    depth: usize,
    quoted: bool,
}

fn token(idx: usize, ch: char, depth: usize, quoted: bool) -> Token {
    Token {
        idx,
        ch,
        depth,
        quoted,
    }
}

/// Whether a `/` or `%r` at this position begins a literal rather than a
/// division or modulo: after an opening bracket, a comma, or whitespace that
/// is not followed by more whitespace.
fn opens_literal(prev: Option<char>, next: Option<char>) -> bool {
    match prev {
        None | Some('(' | '[' | '{' | ',' | '!' | '~') => true,
        Some(p) if p.is_whitespace() => next.is_some_and(|n| !n.is_whitespace() && n != '='),
        Some(_) => false,
    }
}

fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// Tokenizes `code` up to a top-level comment.
///
/// Strings and regex literals (`/.../`, `%r{...}`) are opaque. Returns the
/// tokens and the byte offset of the comment, or `None` when brackets,
/// quotes, or regex literals do not balance.
fn scan(code: &str) -> Option<(Vec<Token>, usize)> {
    let chars: Vec<(usize, char)> = code.char_indices().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut depth = 0usize;
    // Closing delimiter of the open string or regex.
    let mut closer: Option<char> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let (idx, ch) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);
        i += 1;

        if let Some(close) = closer {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == close {
                closer = None;
            }
            tokens.push(token(idx, ch, depth, true));
            prev = Some(ch);
            continue;
        }
        match ch {
            '#' if depth == 0 && prev.map_or(true, char::is_whitespace) => {
                return Some((tokens, idx));
            }
            '"' | '\'' => {
                closer = Some(ch);
                tokens.push(token(idx, ch, depth, true));
            }
            '/' if opens_literal(prev, next) => {
                closer = Some('/');
                tokens.push(token(idx, ch, depth, true));
            }
            '%' if next == Some('r') && opens_literal(prev, next) => {
                let &(open_idx, open) = chars.get(i + 1)?;
                if !open.is_ascii_punctuation() {
                    tokens.push(token(idx, ch, depth, false));
                } else {
                    closer = Some(closing_delimiter(open));
                    tokens.push(token(idx, ch, depth, true));
                    tokens.push(token(idx + 1, 'r', depth, true));
                    tokens.push(token(open_idx, open, depth, true));
                    i += 2;
                    prev = Some(open);
                    continue;
                }
            }
            '(' | '[' | '{' => {
                tokens.push(token(idx, ch, depth, false));
                depth += 1;
            }
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                tokens.push(token(idx, ch, depth, false));
            }
            _ => tokens.push(token(idx, ch, depth, false)),
        }
        prev = Some(ch);
    }

    if depth != 0 || closer.is_some() {
        return None;
    }
    Some((tokens, code.len()))
}

/// Splits a top-level trailing `if`/`unless` modifier off `code`.
///
/// Returns the code before it and the modifier with its leading whitespace.
fn split_modifier(code: &str) -> Option<(&str, &str)> {
    let (tokens, _) = scan(code)?;
    let at = tokens
        .iter()
        .filter(|t| t.depth == 0 && !t.quoted && (t.ch == ' ' || t.ch == '\t'))
        .map(|t| t.idx)
        .find(|&idx| {
            let after = &code[idx + 1..];
            ["if", "unless"].into_iter().any(|kw| {
                after
                    .strip_prefix(kw)
                    .is_some_and(|rest| rest.starts_with([' ', '\t']))
            })
        });
    Some(match at {
        Some(idx) => {
            let head = code[..idx].trim_end();
            (head, &code[head.len()..])
        }
        None => (code, ""),
    })
}

/// Parses the text following a method name: either `(a, b)` or ` a, b`.
///
/// Returns `None` if the list is unbalanced.
pub fn parse_call(rest: &str) -> Option<CallArgs> {
    let (_, comment_at) = scan(rest)?;
    let (code, comment) = rest.split_at(comment_at);
    let trimmed_end = code.trim_end();
    let comment = format!("{}{}", &code[trimmed_end.len()..], comment);
    let (code, modifier) = split_modifier(trimmed_end.trim_start())?;

    let inner = match strip_wrapping_parens(code) {
        Some(inner) => inner,
        None => code,
    };
    Some(CallArgs {
        args: split_top_level(inner)?,
        modifier: modifier.to_string(),
        comment: if comment.trim().is_empty() {
            String::new()
        } else {
            comment
        },
    })
}

/// Splits `code` into the code and its trailing comment (with the
/// whitespace before it). `None` if brackets or quotes do not balance.
pub fn split_comment(code: &str) -> Option<(&str, &str)> {
    let (_, comment_at) = scan(code)?;
    let (body, _) = code.split_at(comment_at);
    let body_end = body.trim_end().len();
    Some(code.split_at(body_end))
}

/// For `code` starting with `(`, returns the group's contents and the text
/// after its closing paren.
pub fn leading_group(code: &str) -> Option<(&str, &str)> {
    if !code.starts_with('(') {
        return None;
    }
    let (tokens, _) = scan(code)?;
    let close = tokens
        .iter()
        .skip(1)
        .find(|t| t.ch == ')' && t.depth == 0 && !t.quoted)?;
    Some((&code[1..close.idx], &code[close.idx + 1..]))
}

/// Returns the contents of `code` if it is one parenthesized group.
fn strip_wrapping_parens(code: &str) -> Option<&str> {
    if !code.starts_with('(') {
        return None;
    }
    let (inner, after) = leading_group(code)?;
    after.is_empty().then_some(inner)
}

/// Splits on commas outside brackets and strings.
fn split_top_level(code: &str) -> Option<Vec<String>> {
    let (tokens, _) = scan(code)?;
    let mut args = Vec::new();
    let mut start = 0;
    for t in tokens.iter().filter(|t| t.ch == ',' && t.depth == 0 && !t.quoted) {
        args.push(code[start..t.idx].trim().to_string());
        start = t.idx + 1;
    }
    let last = code[start..].trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last.to_string());
    }
    Some(args)
}
