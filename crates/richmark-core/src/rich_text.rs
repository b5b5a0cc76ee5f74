//! Rich-text items in the document API's inline content model.
//!
//! Each item is a run of text with an optional link and an optional set of
//! annotations. Serialized with serde, an item has exactly the shape the
//! document API accepts:
//!
//! ```json
//! {
//!   "type": "text",
//!   "text": { "content": "docs", "link": { "url": "https://example.com" } },
//!   "annotations": { "bold": true }
//! }
//! ```
//!
//! `link` and `annotations` are omitted when absent, and annotations only
//! ever list flags that are set.

use serde::{Serialize, Serializer};

/// One inline formatting flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    Bold,
    Italic,
    Strikethrough,
    Underline,
    Code,
}

impl Annotation {
    /// All flags in wire order.
    pub const ALL: [Annotation; 5] = [
        Annotation::Bold,
        Annotation::Italic,
        Annotation::Strikethrough,
        Annotation::Underline,
        Annotation::Code,
    ];

    /// Field name in the wire format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Annotation::Bold => "bold",
            Annotation::Italic => "italic",
            Annotation::Strikethrough => "strikethrough",
            Annotation::Underline => "underline",
            Annotation::Code => "code",
        }
    }
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// A set of independent formatting flags.
///
/// Underline is part of the document API's model, but no markdown
/// construct produces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Annotations {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
}

impl Annotations {
    /// The empty set.
    pub const NONE: Annotations = Annotations {
        bold: false,
        italic: false,
        strikethrough: false,
        underline: false,
        code: false,
    };

    /// Copy of this set with `flag` added.
    #[inline]
    pub fn with(mut self, flag: Annotation) -> Self {
        *self.flag_mut(flag) = true;
        self
    }

    /// Check if `flag` is set.
    #[inline]
    pub fn contains(&self, flag: Annotation) -> bool {
        match flag {
            Annotation::Bold => self.bold,
            Annotation::Italic => self.italic,
            Annotation::Strikethrough => self.strikethrough,
            Annotation::Underline => self.underline,
            Annotation::Code => self.code,
        }
    }

    /// Check if no flag is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Flags set in either operand.
    pub fn union(self, other: Annotations) -> Self {
        other.iter().fold(self, Annotations::with)
    }

    /// Iterate over the set flags in wire order.
    pub fn iter(&self) -> impl Iterator<Item = Annotation> + '_ {
        Annotation::ALL.into_iter().filter(move |flag| self.contains(*flag))
    }

    fn flag_mut(&mut self, flag: Annotation) -> &mut bool {
        match flag {
            Annotation::Bold => &mut self.bold,
            Annotation::Italic => &mut self.italic,
            Annotation::Strikethrough => &mut self.strikethrough,
            Annotation::Underline => &mut self.underline,
            Annotation::Code => &mut self.code,
        }
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        iter.into_iter().fold(Annotations::NONE, Annotations::with)
    }
}

/// An atomic run of formatted text.
///
/// Built only through [`RichTextItem::build`], which keeps the invariant
/// that `annotations` is either absent or non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextItem {
    content: String,
    link: Option<String>,
    annotations: Option<Annotations>,
}

impl RichTextItem {
    /// Assemble an item, attaching annotations only when at least one flag
    /// is set and the link only when present.
    pub fn build(content: impl Into<String>, annotations: Annotations, link: Option<&str>) -> Self {
        Self {
            content: content.into(),
            link: link.map(str::to_owned),
            annotations: (!annotations.is_empty()).then_some(annotations),
        }
    }

    /// Unformatted, unlinked text.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::build(content, Annotations::NONE, None)
    }

    /// The text of this run.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The link URL, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// The annotation set, if any flag is set.
    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    /// The annotation set, empty when absent.
    pub fn flags(&self) -> Annotations {
        self.annotations.unwrap_or_default()
    }

    /// Check if the content is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    fn wire(&self) -> WireItem<'_> {
        WireItem {
            kind: "text",
            text: WireText {
                content: &self.content,
                link: self.link.as_deref().map(|url| WireLink { url }),
            },
            annotations: self.annotations.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct WireItem<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: WireText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations: Option<&'a Annotations>,
}

#[derive(Serialize)]
struct WireText<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<WireLink<'a>>,
}

#[derive(Serialize)]
struct WireLink<'a> {
    url: &'a str,
}

impl Serialize for RichTextItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.wire().serialize(serializer)
    }
}

/// Concatenate item contents: the text a reader sees with formatting dropped.
pub fn plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(RichTextItem::content).collect()
}

/// Render items as a JSON array ready to drop into a request body.
pub fn to_json_value(items: &[RichTextItem]) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(items)
}
