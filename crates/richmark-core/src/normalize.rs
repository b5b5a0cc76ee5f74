//! Input guard run before any parsing.

use std::borrow::Cow;

use memchr::memmem;

/// Check if `text` is empty or contains only whitespace.
#[inline]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Replace every `\r\n` with `\n`. No other whitespace is touched, so a
/// lone `\r` survives.
///
/// Borrows the input when there is nothing to replace.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if memmem::find(text.as_bytes(), b"\r\n").is_some() {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Guard the converter's input.
///
/// Returns `None` for absent or blank markdown, otherwise the text with
/// line endings normalized.
///
/// ```rust
/// use richmark_core::normalize::prepare;
///
/// assert_eq!(prepare(None), None);
/// assert_eq!(prepare(Some(" \n\t")), None);
/// assert_eq!(prepare(Some("a\r\nb")).as_deref(), Some("a\nb"));
/// ```
pub fn prepare(markdown: Option<&str>) -> Option<Cow<'_, str>> {
    match markdown {
        Some(text) if !is_blank(text) => Some(normalize_line_endings(text)),
        _ => None,
    }
}
