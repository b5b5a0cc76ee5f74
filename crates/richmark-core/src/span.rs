//! Byte ranges into the normalized markdown input.
//!
//! Tokens and diagnostics carry a `Span` so callers can point back at the
//! exact source text a rich-text item or a rejected construct came from.

/// A byte range in the normalized input.
///
/// Offsets are bytes, not characters. Every delimiter the converter
/// recognizes is ASCII, so span boundaries always land on UTF-8 character
/// boundaries. Ranges are half-open: `[start, end)`. Offsets past
/// `u32::MAX` saturate, so spans in inputs over 4 GiB stop at that value.
///
/// # Example
///
/// ```rust
/// use richmark_core::span::Span;
///
/// let source = "see [x](bad)";
/// let span = Span::at(4, 0, 8);
/// assert_eq!(span, Span::new(4, 12));
/// assert_eq!(span.slice(source), Some("[x](bad)"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: u32,
    /// Ending byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Build a span from `usize` offsets relative to `base`, saturating at
    /// `u32::MAX`.
    #[inline]
    pub fn at(base: usize, start: usize, end: usize) -> Self {
        Self::new(saturate(base.saturating_add(start)), saturate(base.saturating_add(end)))
    }

    /// Slice `source` by this span, if the range is valid for it.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start as usize..self.end as usize)
    }
}

#[inline]
fn saturate(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
