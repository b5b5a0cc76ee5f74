//! Token scanner for inline markdown.
//!
//! The scanner walks one span of text left to right. At each step every
//! construct offers its earliest candidate and the earliest-starting one
//! wins. Ties at the same byte offset go to the higher-priority kind:
//! `Link > Code > Bold > Italic > Strikethrough`.
//!
//! # Performance
//!
//! - Zero-copy: tokens borrow directly from the scanned text
//! - SIMD-accelerated delimiter search via `memchr`
//! - One cursor per kind carries its search across steps, so a candidate
//!   is examined once per span however many tokens precede it

use std::cell::{Cell, OnceCell};
use std::collections::VecDeque;

use memchr::{memchr, memchr2, memchr3};

use crate::error::Diagnostic;
use crate::link::{self, TitleForm};
use crate::span::Span;

/// Kinds of inline construct, declared in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// `[label](url)`
    Link,
    /// `` `code` ``
    Code,
    /// `**bold**` or `__bold__`
    Bold,
    /// `*italic*` or `_italic_`
    Italic,
    /// `~~strikethrough~~`
    Strikethrough,
}

impl TokenKind {
    /// All kinds, highest priority first.
    pub const ALL: [TokenKind; 5] = [
        TokenKind::Link,
        TokenKind::Code,
        TokenKind::Bold,
        TokenKind::Italic,
        TokenKind::Strikethrough,
    ];

    /// Short name used in logs and diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            TokenKind::Link => "link",
            TokenKind::Code => "code",
            TokenKind::Bold => "bold",
            TokenKind::Italic => "italic",
            TokenKind::Strikethrough => "strikethrough",
        }
    }
}

/// A recognized inline construct.
///
/// Offsets are relative to the text the scanner was built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownToken<'a> {
    /// Construct kind.
    pub kind: TokenKind,
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
    /// Matched text including delimiters.
    pub raw: &'a str,
    /// Text between the delimiters (the label, for links).
    pub content: &'a str,
    /// Byte offset where `content` begins.
    pub content_start: usize,
    /// Validated target, only for links.
    pub url: Option<&'a str>,
    /// Whether a link's title was stripped from its target.
    pub title: TitleForm,
}

impl<'a> MarkdownToken<'a> {
    pub(crate) fn new(
        kind: TokenKind,
        text: &'a str,
        start: usize,
        end: usize,
        content_start: usize,
        content_end: usize,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            raw: &text[start..end],
            content: &text[content_start..content_end],
            content_start,
            url: None,
            title: TitleForm::None,
        }
    }

    pub(crate) fn with_url(mut self, url: &'a str, title: TitleForm) -> Self {
        self.url = Some(url);
        self.title = title;
        self
    }
}

/// A candidate a detector looked at and dropped.
///
/// Rejections are only reported when they sit in text that ends up literal,
/// i.e. before the chosen token, so a bad link inside a code span stays quiet.
#[derive(Debug)]
pub(crate) struct Rejection {
    pub start: usize,
    pub diagnostic: Diagnostic,
}

/// What a detector concluded about one candidate opener.
pub(crate) enum Verdict<'a> {
    /// Not a token here; try the next candidate byte.
    Miss,
    /// Dropped with a diagnostic; the search resumes at `resume`.
    Reject { rejection: Rejection, resume: usize },
    Match(MarkdownToken<'a>),
    /// Nothing at or after this candidate can match.
    Exhausted,
}

/// The span being scanned, shared by every cursor.
pub(crate) struct Source<'a> {
    pub text: &'a str,
    pub bytes: &'a [u8],
    pub base_offset: usize,
    parens: OnceCell<link::ParenIndex>,
    /// Last `]` lookup: where it started and what it found.
    last_bracket: Cell<Option<(usize, Option<usize>)>>,
}

impl<'a> Source<'a> {
    fn new(text: &'a str, base_offset: usize) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            base_offset,
            parens: OnceCell::new(),
            last_bracket: Cell::new(None),
        }
    }

    /// Absolute span for offsets into this text.
    #[inline]
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::at(self.base_offset, start, end)
    }

    /// Matching `)` for the `(` at `open`. Built on first use.
    pub fn match_paren(&self, open: usize) -> Result<usize, usize> {
        self.parens
            .get_or_init(|| link::ParenIndex::new(self.bytes))
            .partner(open)
    }

    /// First `]` after the `[` at `open`.
    pub fn close_bracket(&self, open: usize) -> Option<usize> {
        let start = open + 1;
        // Link candidates are asked about in increasing order, so the last
        // answer usually still holds.
        if let Some((from, found)) = self.last_bracket.get() {
            if from <= start && found.map_or(true, |close| start <= close) {
                return found;
            }
        }
        let found = memchr(b']', &self.bytes[start..]).map(|offset| start + offset);
        self.last_bracket.set(Some((start, found)));
        found
    }

    fn examine(&self, kind: TokenKind, from: usize, at: usize) -> Verdict<'a> {
        match kind {
            TokenKind::Link => link::match_link(self, at),
            TokenKind::Code => self.match_code(at),
            TokenKind::Bold | TokenKind::Strikethrough => self.match_double(kind, at),
            TokenKind::Italic => self.match_italic(from, at),
        }
    }

    /// Keep a matched token unless its content is blank.
    fn accept(&self, token: MarkdownToken<'a>) -> Verdict<'a> {
        if !token.content.trim().is_empty() {
            return Verdict::Match(token);
        }
        tracing::debug!(
            kind = token.kind.name(),
            start = self.base_offset + token.start,
            "discarding blank span"
        );
        Verdict::Reject {
            rejection: Rejection {
                start: token.start,
                diagnostic: Diagnostic::blank_span(token.kind.name(), self.span(token.start, token.end)),
            },
            resume: token.end,
        }
    }

    /// `` `...` ``: the body holds no backtick and no newline.
    fn match_code(&self, open: usize) -> Verdict<'a> {
        let bytes = self.bytes;
        let body = open + 1;

        match memchr2(b'`', b'\n', &bytes[body..]) {
            Some(len) if len > 0 && bytes[body + len] == b'`' => {
                let close = body + len;
                self.accept(MarkdownToken::new(TokenKind::Code, self.text, open, close + 1, body, close))
            }
            _ => Verdict::Miss,
        }
    }

    /// Paired two-byte delimiters (`**`, `__`, `~~`). The body is at least
    /// one byte, holds no newline, and ends at the first closing pair.
    fn match_double(&self, kind: TokenKind, open: usize) -> Verdict<'a> {
        let delim = self.bytes[open];
        if self.bytes.get(open + 1) != Some(&delim) {
            return Verdict::Miss;
        }

        match self.find_double_close(delim, open + 2) {
            Some(close) => self.accept(MarkdownToken::new(kind, self.text, open, close + 2, open + 2, close)),
            None => Verdict::Miss,
        }
    }

    fn find_double_close(&self, delim: u8, body: usize) -> Option<usize> {
        let bytes = self.bytes;
        // The first body byte may be anything but a newline, even the delimiter.
        match bytes.get(body) {
            None | Some(b'\n') => return None,
            Some(_) => {}
        }

        let mut pos = body + 1;
        while let Some(offset) = memchr2(delim, b'\n', &bytes[pos..]) {
            let at = pos + offset;
            if bytes[at] == b'\n' {
                return None;
            }
            if bytes.get(at + 1) == Some(&delim) {
                return Some(at);
            }
            pos = at + 1;
        }

        None
    }

    /// Single `*` or `_` delimiters. Neither the opening nor the closing
    /// delimiter may touch another copy of itself, so `**` never reads as
    /// two italic markers. Nothing before `from` is looked at.
    fn match_italic(&self, from: usize, open: usize) -> Verdict<'a> {
        let delim = self.bytes[open];
        if !self.is_lone(from, open, delim) {
            return Verdict::Miss;
        }

        match self.find_italic_close(from, delim, open + 1) {
            Some(close) => self.accept(MarkdownToken::new(TokenKind::Italic, self.text, open, close + 1, open + 1, close)),
            None => Verdict::Miss,
        }
    }

    fn find_italic_close(&self, from: usize, delim: u8, body: usize) -> Option<usize> {
        let bytes = self.bytes;
        match bytes.get(body) {
            None | Some(b'\n') => return None,
            Some(_) => {}
        }

        let mut pos = body + 1;
        while let Some(offset) = memchr2(delim, b'\n', &bytes[pos..]) {
            let at = pos + offset;
            if bytes[at] == b'\n' {
                return None;
            }
            if self.is_lone(from, at, delim) {
                return Some(at);
            }
            pos = at + 1;
        }

        None
    }

    /// The delimiter at `at` has no copy of itself on either side.
    #[inline(always)]
    fn is_lone(&self, from: usize, at: usize, delim: u8) -> bool {
        let before = at > from && self.bytes[at - 1] == delim;
        let after = self.bytes.get(at + 1) == Some(&delim);
        !before && !after
    }

    /// A lone-delimiter check at `pos` would see a different neighbour
    /// depending on whether the search started at `pos` or before it.
    fn lookbehind_shifts(&self, kind: TokenKind, from: usize, pos: usize) -> bool {
        kind == TokenKind::Italic
            && pos > from
            && matches!(self.bytes.get(pos), Some(b'*' | b'_'))
            && self.bytes[pos - 1] == self.bytes[pos]
    }
}

/// Next byte at or after `at` that could open a token of `kind`.
fn next_candidate(bytes: &[u8], kind: TokenKind, at: usize) -> Option<usize> {
    let rest = bytes.get(at..)?;
    let offset = match kind {
        TokenKind::Link => memchr(b'[', rest),
        TokenKind::Code => memchr(b'`', rest),
        TokenKind::Bold | TokenKind::Italic => memchr2(b'*', b'_', rest),
        TokenKind::Strikethrough => memchr(b'~', rest),
    }?;
    Some(at + offset)
}

/// Search state for one kind, kept across steps of a scan.
///
/// A cursor records the walk it made from `from`: the token it stopped at,
/// the blank spans it jumped over, and the rejections not yet reported or
/// dropped. Whether a candidate matches depends only on its own offset,
/// except for the lookbehind of a lone delimiter where the walk began, so a
/// later walk that reaches any candidate this one examined can take over the
/// rest of it.
#[derive(Default)]
struct Cursor<'a> {
    primed: bool,
    from: usize,
    found: Option<MarkdownToken<'a>>,
    skips: VecDeque<(usize, usize)>,
    pending: VecDeque<Rejection>,
}

impl<'a> Cursor<'a> {
    fn bound(&self) -> usize {
        self.found.map_or(usize::MAX, |t| t.start)
    }

    /// `at` is a candidate this cursor already examined.
    fn visited(&self, at: usize) -> bool {
        self.primed && at >= self.from && at <= self.bound() && !self.jumped_over(at)
    }

    fn jumped_over(&self, at: usize) -> bool {
        let i = self.skips.partition_point(|&(open, _)| open < at);
        i > 0 && at < self.skips[i - 1].1
    }

    /// Forget everything behind `pos`.
    fn trim(&mut self, pos: usize) {
        while self.skips.front().is_some_and(|&(_, resume)| resume <= pos) {
            self.skips.pop_front();
        }
        while self.pending.front().is_some_and(|r| r.start < pos) {
            self.pending.pop_front();
        }
    }

    /// Bring the cursor up to `pos`: reuse the recorded walk when it still
    /// covers `pos`, otherwise walk forward until it can be rejoined.
    fn advance(&mut self, source: &Source<'a>, kind: TokenKind, pos: usize) {
        if self.primed
            && pos >= self.from
            && pos <= self.bound()
            && !self.jumped_over(pos)
            && !source.lookbehind_shifts(kind, self.from, pos)
        {
            self.trim(pos);
            return;
        }

        let previous = std::mem::take(self);
        self.primed = true;
        self.from = pos;

        let mut at = pos;
        while let Some(candidate) = next_candidate(source.bytes, kind, at) {
            if previous.visited(candidate)
                && !(candidate == pos && source.lookbehind_shifts(kind, previous.from, pos))
            {
                self.found = previous.found;
                self.skips
                    .extend(previous.skips.into_iter().filter(|&(open, _)| open >= candidate));
                self.pending
                    .extend(previous.pending.into_iter().filter(|r| r.start >= candidate));
                return;
            }

            match source.examine(kind, pos, candidate) {
                Verdict::Miss => at = candidate + 1,
                Verdict::Reject { rejection, resume } => {
                    if resume > candidate + 1 {
                        self.skips.push_back((candidate, resume));
                    }
                    self.pending.push_back(rejection);
                    at = resume;
                }
                Verdict::Match(token) => {
                    self.found = Some(token);
                    return;
                }
                Verdict::Exhausted => return,
            }
        }
    }
}

/// Scanner over one span of text.
///
/// Each call to [`next_token`](Self::next_token) resumes where the previous
/// token ended. The scanner is also an iterator over the tokens of its span.
///
/// ```rust
/// use richmark_core::{Scanner, TokenKind};
///
/// let kinds: Vec<TokenKind> = Scanner::new("*a* and [b](/b)", 0).map(|t| t.kind).collect();
/// assert_eq!(kinds, [TokenKind::Italic, TokenKind::Link]);
/// ```
pub struct Scanner<'a> {
    source: Source<'a>,
    pos: usize,
    cursors: [Cursor<'a>; 5],
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `text`, which starts at `base_offset` in the
    /// normalized input.
    #[inline]
    pub fn new(text: &'a str, base_offset: usize) -> Self {
        Self {
            source: Source::new(text, base_offset),
            pos: 0,
            cursors: Default::default(),
        }
    }

    /// Offset where the next search starts: the end of the last token.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Find the earliest-starting token at or after the current position,
    /// or `None` if nothing matches.
    pub fn next_token(&mut self) -> Option<MarkdownToken<'a>> {
        self.next_token_with_diagnostics().0
    }

    /// Like [`next_token`](Self::next_token), also returning diagnostics for
    /// candidates rejected in front of the chosen token.
    pub fn next_token_with_diagnostics(&mut self) -> (Option<MarkdownToken<'a>>, Vec<Diagnostic>) {
        let pos = self.pos;
        let mut best: Option<MarkdownToken<'a>> = None;

        for kind in TokenKind::ALL {
            let cursor = &mut self.cursors[kind as usize];
            cursor.advance(&self.source, kind, pos);
            // Lower-priority kinds must start strictly earlier to win a tie.
            if let Some(token) = cursor.found {
                if best.map_or(true, |b| token.start < b.start) {
                    best = Some(token);
                }
            }
        }

        let cutoff = best.map_or(usize::MAX, |t| t.start);
        let mut diagnostics = Vec::new();
        for cursor in &mut self.cursors {
            let reported = cursor.pending.partition_point(|r| r.start < cutoff);
            diagnostics.extend(cursor.pending.drain(..reported).map(|r| r.diagnostic));
        }

        match best {
            Some(token) => {
                tracing::trace!(
                    kind = token.kind.name(),
                    start = self.source.base_offset + token.start,
                    "token"
                );
                self.pos = token.end;
            }
            None => self.pos = self.source.bytes.len(),
        }
        (best, diagnostics)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = MarkdownToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Check whether `text` contains any byte that can start a token.
///
/// Lets callers skip the scanner for plain text.
#[inline]
pub fn has_markup(text: &str) -> bool {
    let bytes = text.as_bytes();
    memchr3(b'*', b'_', b'`', bytes).is_some() || memchr2(b'[', b'~', bytes).is_some()
}
