//! Link matcher for `[label](target "optional title")`.
//!
//! The target is found by counting parentheses, so URLs such as
//! `https://example.com/a(b)c` keep their inner pairs. A target must be an
//! absolute URL (`scheme:`), a root-relative path (`/...`) or an anchor
//! (`#...`); anything else leaves the brackets as literal text.

use memchr::memchr3;

use crate::error::Diagnostic;
use crate::lexer::{MarkdownToken, Verdict, Rejection, Source, TokenKind};

/// How the raw target text was split into URL and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleForm {
    /// No whitespace in the target: the whole target is the URL.
    None,
    /// `url "title"`: the title was dropped.
    Quoted,
    /// Whitespace without a well-formed quoted title. Such links are left
    /// as literal text.
    Malformed,
}

/// Split a trimmed link target into its URL and the shape of any title.
///
/// ```rust
/// use richmark_core::link::{split_title, TitleForm};
///
/// assert_eq!(
///     split_title(r#"https://example.com/path "Example""#),
///     ("https://example.com/path", TitleForm::Quoted)
/// );
/// assert_eq!(split_title("/docs"), ("/docs", TitleForm::None));
/// ```
pub fn split_title(target: &str) -> (&str, TitleForm) {
    let Some(gap) = target.find(char::is_whitespace) else {
        return (target, TitleForm::None);
    };

    let title = target[gap..].trim_start();
    if title.len() >= 2 && title.starts_with('"') && title.ends_with('"') {
        (&target[..gap], TitleForm::Quoted)
    } else {
        (target, TitleForm::Malformed)
    }
}

/// Check that a link target is an absolute URL, a root-relative path or an
/// anchor.
///
/// ```rust
/// use richmark_core::link::is_valid_target;
///
/// assert!(is_valid_target("https://example.com"));
/// assert!(is_valid_target("mailto:someone@example.com"));
/// assert!(is_valid_target("/relative/to/root"));
/// assert!(is_valid_target("#section"));
/// assert!(!is_valid_target("example.com"));
/// assert!(!is_valid_target(""));
/// ```
pub fn is_valid_target(target: &str) -> bool {
    let bytes = target.as_bytes();
    match bytes.first() {
        Some(b'/') | Some(b'#') => true,
        Some(first) if first.is_ascii_alphabetic() => has_scheme(bytes),
        _ => false,
    }
}

/// `letter (letter | digit | + | . | -)* :`
fn has_scheme(bytes: &[u8]) -> bool {
    for &b in &bytes[1..] {
        match b {
            b':' => return true,
            b'+' | b'.' | b'-' => {}
            _ if b.is_ascii_alphanumeric() => {}
            _ => return false,
        }
    }
    false
}

/// Test the `[` at `open` as the start of a link.
///
/// A failed candidate never ends the search: scanning resumes at the byte
/// after its `[`.
pub(crate) fn match_link<'a>(source: &Source<'a>, open: usize) -> Verdict<'a> {
    let text = source.text;
    let bytes = source.bytes;

    // Without a `]` after this `[` there is none after any later one.
    let Some(close) = source.close_bracket(open) else {
        return Verdict::Exhausted;
    };
    let label = &text[open + 1..close];
    if label.trim().is_empty() || bytes.get(close + 1) != Some(&b'(') {
        return Verdict::Miss;
    }

    let target_start = close + 2;
    let target_end = match source.match_paren(close + 1) {
        Ok(end) => end,
        Err(stop) => {
            tracing::debug!(start = source.base_offset + open, "unterminated link target");
            return reject(open, Diagnostic::unterminated_link_target(source.span(open, stop)));
        }
    };

    let span = source.span(open, target_end + 1);
    let target = text[target_start..target_end].trim();
    let (url, form) = split_title(target);

    if form == TitleForm::Malformed {
        tracing::debug!(start = source.base_offset + open, target, "malformed link title");
        return reject(open, Diagnostic::malformed_link_title(target, span));
    }
    if !is_valid_target(url) {
        tracing::debug!(start = source.base_offset + open, url, "rejecting link target");
        return reject(open, Diagnostic::invalid_link_target(url, span));
    }

    let token = MarkdownToken::new(TokenKind::Link, text, open, target_end + 1, open + 1, close);
    Verdict::Match(token.with_url(url, form))
}

fn reject<'a>(open: usize, diagnostic: Diagnostic) -> Verdict<'a> {
    Verdict::Reject {
        rejection: Rejection { start: open, diagnostic },
        resume: open + 1,
    }
}

/// Matching `)` for every `(` in a span, found in one pass.
///
/// Pairs never cross a newline.
pub(crate) struct ParenIndex {
    /// For each `(`, sorted by offset: `Ok(close)` when matched, otherwise
    /// `Err(stop)` with the newline or end of input that cut it off.
    opens: Vec<(usize, Result<usize, usize>)>,
}

impl ParenIndex {
    pub(crate) fn new(bytes: &[u8]) -> Self {
        let mut opens = Vec::new();
        let mut stack = Vec::new();
        let mut pos = 0;

        while let Some(offset) = memchr3(b'(', b')', b'\n', &bytes[pos..]) {
            let at = pos + offset;
            match bytes[at] {
                b'(' => stack.push(at),
                b')' => {
                    if let Some(start) = stack.pop() {
                        opens.push((start, Ok(at)));
                    }
                }
                _ => opens.extend(stack.drain(..).map(|start| (start, Err(at)))),
            }
            pos = at + 1;
        }
        opens.extend(stack.drain(..).map(|start| (start, Err(bytes.len()))));

        opens.sort_unstable_by_key(|&(start, _)| start);
        Self { opens }
    }

    /// Offset of the `)` matching the `(` at `open`, or, when unmatched, the
    /// offset where the search stopped: the next newline or the end of input.
    pub(crate) fn partner(&self, open: usize) -> Result<usize, usize> {
        match self.opens.binary_search_by_key(&open, |&(start, _)| start) {
            Ok(i) => self.opens[i].1,
            Err(_) => Err(open),
        }
    }
}
