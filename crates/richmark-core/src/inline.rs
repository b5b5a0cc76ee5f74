//! Recursive inline parser.
//!
//! Walks a span left to right, emitting plain-text runs between tokens and
//! recursing into token bodies with the token's annotation (or link) added
//! to the active state. One scanner serves the whole span, so the walk is
//! linear in its length. Every body excludes its own delimiters, so each
//! recursion works on a strictly shorter string. Depth is still capped,
//! since nesting depth is controlled by whoever wrote the markdown.

use crate::error::{Diagnostic, Diagnostics};
use crate::lexer::{has_markup, Scanner, TokenKind};
use crate::rich_text::{Annotation, Annotations, RichTextItem};
use crate::span::Span;

/// Parse `text` into rich-text items, dropping blank runs.
///
/// `text` must already be normalized. Offsets in `diagnostics` are
/// relative to its start.
pub fn parse_inlines(text: &str, max_depth: usize, diagnostics: &mut Diagnostics) -> Vec<RichTextItem> {
    let mut items = if has_markup(text) {
        let mut parser = InlineParser {
            max_depth,
            diagnostics,
            items: Vec::with_capacity(8),
        };
        parser.parse(text, 0, Annotations::NONE, None, 0);
        parser.items
    } else {
        vec![RichTextItem::plain(text)]
    };

    items.retain(|item| !item.is_blank());
    items
}

struct InlineParser<'d> {
    max_depth: usize,
    diagnostics: &'d mut Diagnostics,
    items: Vec<RichTextItem>,
}

impl<'d> InlineParser<'d> {
    fn emit(&mut self, content: &str, annotations: Annotations, link: Option<&str>) {
        self.items.push(RichTextItem::build(content, annotations, link));
    }

    fn parse(
        &mut self,
        text: &str,
        base_offset: usize,
        annotations: Annotations,
        link: Option<&str>,
        depth: usize,
    ) {
        let mut scanner = Scanner::new(text, base_offset);

        loop {
            let pos = scanner.position();
            let (token, rejected) = scanner.next_token_with_diagnostics();
            for diagnostic in rejected {
                self.diagnostics.push(diagnostic);
            }

            let Some(token) = token else {
                if pos < text.len() {
                    self.emit(&text[pos..], annotations, link);
                }
                return;
            };

            if token.start > pos {
                let plain = &text[pos..token.start];
                if !plain.trim().is_empty() {
                    self.emit(plain, annotations, link);
                }
            }

            let body_offset = base_offset + token.content_start;
            match token.kind {
                TokenKind::Link => {
                    // The inner link replaces any outer one.
                    self.descend(token.content, body_offset, annotations, token.url, depth);
                }
                TokenKind::Code => {
                    self.emit(token.content, annotations.with(Annotation::Code), link);
                }
                TokenKind::Bold => {
                    let inner = annotations.with(Annotation::Bold);
                    self.descend(token.content, body_offset, inner, link, depth);
                }
                TokenKind::Italic => {
                    let inner = annotations.with(Annotation::Italic);
                    self.descend(token.content, body_offset, inner, link, depth);
                }
                TokenKind::Strikethrough => {
                    let inner = annotations.with(Annotation::Strikethrough);
                    self.descend(token.content, body_offset, inner, link, depth);
                }
            }
        }
    }

    /// Recurse into a token body one level deeper, or keep it literal once
    /// the cap is reached.
    fn descend(
        &mut self,
        body: &str,
        base_offset: usize,
        annotations: Annotations,
        link: Option<&str>,
        depth: usize,
    ) {
        let depth = depth + 1;
        if depth > self.max_depth {
            tracing::warn!(
                max_depth = self.max_depth,
                offset = base_offset,
                "nesting cap reached; keeping span literal"
            );
            self.diagnostics.push(Diagnostic::nesting_too_deep(
                self.max_depth,
                Span::at(base_offset, 0, body.len()),
            ));
            self.emit(body, annotations, link);
            return;
        }

        self.parse(body, base_offset, annotations, link, depth);
    }
}
