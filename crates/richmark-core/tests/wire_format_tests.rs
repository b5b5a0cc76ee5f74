//! The serialized shape must match the document API's inline text objects.

use pretty_assertions::assert_eq;
use richmark_core::{markdown_to_rich_text, to_json_value, Annotation, Annotations, RichTextItem};
use serde_json::json;

fn wire(markdown: &str) -> serde_json::Value {
    let items = markdown_to_rich_text(Some(markdown), None).unwrap();
    to_json_value(&items).unwrap()
}

#[test]
fn test_plain_item_has_no_link_or_annotations() {
    assert_eq!(
        wire("hello"),
        json!([{ "type": "text", "text": { "content": "hello" } }])
    );
}

#[test]
fn test_link_and_annotations_are_nested() {
    assert_eq!(
        wire("[**docs**](https://x.io)"),
        json!([{
            "type": "text",
            "text": { "content": "docs", "link": { "url": "https://x.io" } },
            "annotations": { "bold": true }
        }])
    );
}

#[test]
fn test_only_true_flags_are_written() {
    assert_eq!(
        wire("**_`x`_**"),
        json!([{
            "type": "text",
            "text": { "content": "x" },
            "annotations": { "bold": true, "italic": true, "code": true }
        }])
    );
}

#[test]
fn test_mixed_sequence() {
    assert_eq!(
        wire("Ship ~~v1~~ [v2](/releases/2) **now**"),
        json!([
            { "type": "text", "text": { "content": "Ship " } },
            {
                "type": "text",
                "text": { "content": "v1" },
                "annotations": { "strikethrough": true }
            },
            {
                "type": "text",
                "text": { "content": "v2", "link": { "url": "/releases/2" } }
            },
            {
                "type": "text",
                "text": { "content": "now" },
                "annotations": { "bold": true }
            }
        ])
    );
}

#[test]
fn test_underline_serializes_when_set() {
    let item = RichTextItem::build(
        "u",
        Annotations::NONE.with(Annotation::Underline),
        None,
    );
    assert_eq!(
        serde_json::to_value(&item).unwrap(),
        json!({
            "type": "text",
            "text": { "content": "u" },
            "annotations": { "underline": true }
        })
    );
}

#[test]
fn test_field_order_is_stable() {
    let items = markdown_to_rich_text(Some("[a](#b)"), None).unwrap();
    assert_eq!(
        serde_json::to_string(&items).unwrap(),
        r##"[{"type":"text","text":{"content":"a","link":{"url":"#b"}}}]"##
    );
}

#[test]
fn test_empty_list_serializes_as_empty_array() {
    let items = markdown_to_rich_text(
        Some(" "),
        Some(richmark_core::ConvertOptions::new().with_allow_blank(true)),
    )
    .unwrap();
    assert_eq!(to_json_value(&items).unwrap(), json!([]));
}
