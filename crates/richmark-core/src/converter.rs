//! Public entry points for markdown to rich-text conversion.
//!
//! Conversion is total: absent or blank input yields `None` (or an empty
//! list with `allow_blank`), and malformed markup degrades to literal text.
//! Callers that want to know what was absorbed use
//! [`Converter::convert_with_diagnostics`].

use crate::error::Diagnostics;
use crate::inline::parse_inlines;
use crate::normalize::prepare;
use crate::rich_text::RichTextItem;

/// Default cap on nested formatting levels.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Return an empty list instead of `None` for absent or blank input.
    pub allow_blank: bool,
    /// Nesting levels recursed into before the rest of a span is kept as
    /// literal text.
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            allow_blank: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    /// Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether blank input yields an empty list.
    pub fn with_allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    /// Set the nesting cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Items plus whatever the converter absorbed along the way.
#[derive(Debug, Clone, Default)]
pub struct ConvertResult {
    /// `None` when the input was absent or blank and blanks are not allowed.
    pub items: Option<Vec<RichTextItem>>,
    /// Constructs that fell back to literal text, or were cut off.
    pub diagnostics: Diagnostics,
}

impl ConvertResult {
    /// Check if nothing was absorbed.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop the diagnostics.
    pub fn into_items(self) -> Option<Vec<RichTextItem>> {
        self.items
    }
}

/// Markdown to rich-text converter.
///
/// Holds only its options, so one value can be shared freely across
/// threads.
///
/// ```rust
/// use richmark_core::{ConvertOptions, Converter};
///
/// let converter = Converter::new(ConvertOptions::new().with_allow_blank(true));
/// assert_eq!(converter.convert(Some("   ")), Some(Vec::new()));
///
/// let items = converter.convert(Some("see `main.rs`")).unwrap();
/// assert_eq!(items.len(), 2);
/// assert!(items[1].flags().code);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The options this converter runs with.
    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Convert markdown into rich-text items.
    pub fn convert(&self, markdown: Option<&str>) -> Option<Vec<RichTextItem>> {
        self.convert_with_diagnostics(markdown).items
    }

    /// Convert markdown, also reporting absorbed constructs.
    ///
    /// Spans in the diagnostics are byte offsets into the input after
    /// `\r\n` has been normalized to `\n`.
    pub fn convert_with_diagnostics(&self, markdown: Option<&str>) -> ConvertResult {
        let mut diagnostics = Diagnostics::new();

        let Some(text) = prepare(markdown) else {
            tracing::debug!(
                allow_blank = self.options.allow_blank,
                "blank markdown input"
            );
            return ConvertResult {
                items: self.options.allow_blank.then(Vec::new),
                diagnostics,
            };
        };

        let items = parse_inlines(&text, self.options.max_depth, &mut diagnostics);
        tracing::debug!(
            input_len = text.len(),
            items = items.len(),
            absorbed = diagnostics.len(),
            "converted markdown"
        );

        ConvertResult {
            items: Some(items),
            diagnostics,
        }
    }
}

/// Convert markdown into rich-text items.
///
/// `options = None` uses the defaults, under which absent or blank input
/// yields `None`.
///
/// ```rust
/// use richmark_core::markdown_to_rich_text;
///
/// let items = markdown_to_rich_text(Some("**bold with *italic* text**"), None).unwrap();
/// let contents: Vec<&str> = items.iter().map(|item| item.content()).collect();
/// assert_eq!(contents, ["bold with ", "italic", " text"]);
/// assert!(items[1].flags().bold && items[1].flags().italic);
///
/// assert_eq!(markdown_to_rich_text(None, None), None);
/// ```
pub fn markdown_to_rich_text(
    markdown: Option<&str>,
    options: Option<ConvertOptions>,
) -> Option<Vec<RichTextItem>> {
    Converter::new(options.unwrap_or_default()).convert(markdown)
}
