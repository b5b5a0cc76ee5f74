//! # richmark core
//!
//! Converts inline markdown into the annotated rich-text items a document
//! API expects for comments, page blocks and database properties.
//!
//! Supported spans are `**bold**`/`__bold__`, `*italic*`/`_italic_`,
//! `~~strikethrough~~`, `` `code` `` and `[label](url "title")`. Block
//! structure (headings, lists, tables) belongs to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use richmark_core::markdown_to_rich_text;
//!
//! let items = markdown_to_rich_text(Some("Read the [docs](https://example.com)."), None).unwrap();
//!
//! assert_eq!(items.len(), 3);
//! assert_eq!(items[1].content(), "docs");
//! assert_eq!(items[1].link(), Some("https://example.com"));
//! ```
//!
//! ## Wire Format
//!
//! Items serialize to the document API's shape:
//!
//! ```rust
//! use richmark_core::markdown_to_rich_text;
//!
//! let items = markdown_to_rich_text(Some("~~old~~"), None).unwrap();
//! let json = serde_json::to_string(&items).unwrap();
//! assert_eq!(
//!     json,
//!     r#"[{"type":"text","text":{"content":"old"},"annotations":{"strikethrough":true}}]"#
//! );
//! ```
//!
//! ## Diagnostics
//!
//! Conversion never fails, but absorbed constructs can be inspected:
//!
//! ```rust
//! use richmark_core::{Converter, DiagnosticKind};
//!
//! let result = Converter::default().convert_with_diagnostics(Some("[home](example.com)"));
//! assert_eq!(result.items.unwrap()[0].content(), "[home](example.com)");
//! assert_eq!(result.diagnostics.count(DiagnosticKind::InvalidLinkTarget), 1);
//! ```

pub mod converter;
pub mod error;
pub mod inline;
pub mod lexer;
pub mod link;
pub mod normalize;
pub mod rich_text;
pub mod span;

pub use converter::{markdown_to_rich_text, ConvertOptions, ConvertResult, Converter, DEFAULT_MAX_DEPTH};
pub use error::{Diagnostic, DiagnosticKind, Diagnostics};
pub use lexer::{MarkdownToken, Scanner, TokenKind};
pub use rich_text::{plain_text, to_json_value, Annotation, Annotations, RichTextItem};
