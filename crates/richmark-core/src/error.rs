//! Diagnostics for constructs the converter absorbed.
//!
//! Conversion never fails. Malformed markup falls back to literal text, and
//! when the caller asks for it, each absorbed construct is reported here.
use crate::span::Span;
use std::collections::HashSet;
use std::fmt;

/// Categories of absorbed constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Link target is not an absolute URL, a root-relative path or an anchor.
    InvalidLinkTarget,
    /// Newline or end of input before the link target's closing `)`.
    UnterminatedLinkTarget,
    /// Link target contains whitespace without a well-formed `"title"`.
    MalformedLinkTitle,
    /// Delimiters enclosed only whitespace and were discarded.
    BlankSpan,
    /// Nesting depth cap reached; the rest of the span was kept literal.
    NestingTooDeep,
}

impl DiagnosticKind {
    /// Stable snake_case name, used by the CLI and the Python bindings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::InvalidLinkTarget => "invalid_link_target",
            DiagnosticKind::UnterminatedLinkTarget => "unterminated_link_target",
            DiagnosticKind::MalformedLinkTitle => "malformed_link_title",
            DiagnosticKind::BlankSpan => "blank_span",
            DiagnosticKind::NestingTooDeep => "nesting_too_deep",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single absorbed construct with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable description
    pub message: String,
    /// Location in the normalized input
    pub span: Option<Span>,
    /// Category
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
        }
    }

    /// A link whose target failed validation.
    pub fn invalid_link_target(target: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::InvalidLinkTarget,
            format!("invalid link target {:?}", target),
            Some(span),
        )
    }

    /// A link whose target never reached its closing parenthesis.
    pub fn unterminated_link_target(span: Span) -> Self {
        Self::new(
            DiagnosticKind::UnterminatedLinkTarget,
            "unterminated link target",
            Some(span),
        )
    }

    /// A link target with an unquoted or malformed title.
    pub fn malformed_link_title(target: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::MalformedLinkTitle,
            format!("link target {:?} has no well-formed quoted title", target),
            Some(span),
        )
    }

    /// Delimiters around blank content.
    pub fn blank_span(delimiter: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::BlankSpan,
            format!("blank {} span discarded", delimiter),
            Some(span),
        )
    }

    /// Nesting cut off at `max_depth`.
    pub fn nesting_too_deep(max_depth: usize, span: Span) -> Self {
        Self::new(
            DiagnosticKind::NestingTooDeep,
            format!("nesting deeper than {} levels kept as literal text", max_depth),
            Some(span),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at bytes {}..{}", span.start, span.end)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Diagnostics collected during one conversion.
///
/// The scanner revisits the same region of text on every step of the
/// inline walk, so a rejected construct can be seen many times. Only the
/// first report of a given kind at a given span is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    seen: HashSet<(DiagnosticKind, Option<Span>)>,
}

impl Diagnostics {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic unless the same kind was already seen at that span.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.seen.insert((diagnostic.kind, diagnostic.span)) {
            self.items.push(diagnostic);
        }
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Count diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
