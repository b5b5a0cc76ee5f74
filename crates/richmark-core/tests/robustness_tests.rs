//! Pathological inputs: the converter must stay total and bounded.

use std::time::{Duration, Instant};

use richmark_core::{
    markdown_to_rich_text, plain_text, Annotation, ConvertOptions, Converter, DiagnosticKind,
};

fn convert(markdown: &str) -> Vec<richmark_core::RichTextItem> {
    markdown_to_rich_text(Some(markdown), None).expect("non-blank input converts")
}

fn assert_no_blank_items(markdown: &str) {
    for item in convert(markdown) {
        assert!(!item.is_blank(), "blank item from {:?}", markdown);
    }
}

// ============================================================================
// Unmatched Delimiters
// ============================================================================

#[test]
fn test_many_open_brackets() {
    let input = "[".repeat(10_000);
    assert_eq!(plain_text(&convert(&input)), input);
}

#[test]
fn test_many_unterminated_link_targets() {
    let input = "[a](".repeat(1_000);
    let result = Converter::default().convert_with_diagnostics(Some(&input));
    assert_eq!(plain_text(&result.items.unwrap()), input);
    assert_eq!(
        result.diagnostics.count(DiagnosticKind::UnterminatedLinkTarget),
        1_000
    );
}

#[test]
fn test_tokens_before_many_unterminated_links() {
    let n = 4_000;
    let tail = "[a](".repeat(n);
    let input = format!("{}{}", "*x* ".repeat(n), tail);

    let started = Instant::now();
    let result = Converter::default().convert_with_diagnostics(Some(&input));
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());

    let items = result.items.unwrap();
    assert_eq!(items.len(), n + 1);
    assert!(items[..n].iter().all(|item| item.content() == "x" && item.flags().italic));
    assert_eq!(items[n].content(), format!(" {}", tail));
    assert_eq!(
        result.diagnostics.count(DiagnosticKind::UnterminatedLinkTarget),
        n
    );
}

#[test]
fn test_blank_spans_between_many_tokens() {
    let n = 3_000;
    let input = "** ** *a* ".repeat(n);

    let started = Instant::now();
    let result = Converter::default().convert_with_diagnostics(Some(&input));
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());

    let items = result.items.unwrap();
    assert_eq!(items.len(), 2 * n);
    assert_eq!(items.iter().filter(|item| item.flags().italic).count(), n);
    assert_eq!(items[0].content(), "** ** ");
    assert_eq!(items[2].content(), " ** ** ");
    assert_eq!(result.diagnostics.count(DiagnosticKind::BlankSpan), n);
}

#[test]
fn test_many_open_brackets_before_one_close() {
    let input = format!("{}]", "[a ".repeat(10_000));
    assert_eq!(plain_text(&convert(&input)), input);
}

#[test]
fn test_many_backticks() {
    let input = "`".repeat(10_001);
    assert_eq!(plain_text(&convert(&input)), input);
}

#[test]
fn test_run_of_asterisks() {
    let input = "*".repeat(5_000);
    let items = convert(&input);
    assert!(!items.is_empty());
    assert!(items.iter().all(|item| item.content().chars().all(|c| c == '*')));
}

#[test]
fn test_run_of_tildes_and_underscores() {
    for input in ["~".repeat(4_001), "_".repeat(4_001), "~_".repeat(2_000)] {
        assert!(!convert(&input).is_empty());
    }
}

#[test]
fn test_unclosed_delimiters_every_line() {
    let input = "**open *half `tick [link](\n".repeat(500);
    assert_no_blank_items(&input);
    assert!(plain_text(&convert(&input)).contains("[link]("));
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_repeated_same_delimiter_does_not_nest() {
    let depth = 2_000;
    let input = format!("{}x{}", "**".repeat(depth), "**".repeat(depth));
    let result = Converter::default().convert_with_diagnostics(Some(&input));
    assert!(result.items.is_some());
    assert_eq!(result.diagnostics.count(DiagnosticKind::NestingTooDeep), 0);
}

#[test]
fn test_depth_cap_bounds_every_nesting_chain() {
    let input = "[**__*_~~deep~~_*__**](https://a.io) ".repeat(200);
    for max_depth in 0..8 {
        let converter = Converter::new(ConvertOptions::new().with_max_depth(max_depth));
        let result = converter.convert_with_diagnostics(Some(&input));
        let items = result.items.as_ref().unwrap();
        assert!(!items.is_empty());
        if max_depth >= 6 {
            assert!(result.is_clean());
            assert!(items.iter().all(|item| item.flags().contains(Annotation::Strikethrough)));
        } else {
            assert_eq!(result.diagnostics.count(DiagnosticKind::NestingTooDeep), 200);
        }
    }
}

// ============================================================================
// Size and Encoding
// ============================================================================

#[test]
fn test_long_mixed_document() {
    let line = "Some **bold** and *italic* text with `code`, ~~old~~ and [a link](https://example.com/a(b)c \"t\").\r\n";
    let input = line.repeat(2_000);
    let items = convert(&input);
    assert_eq!(items.iter().filter(|i| i.link().is_some()).count(), 2_000);
    assert_eq!(items.iter().filter(|i| i.flags().code).count(), 2_000);
    assert!(!plain_text(&items).contains('\r'));
}

#[test]
fn test_multibyte_around_delimiters() {
    let inputs = [
        "**日本語**",
        "*émphase*_ü_",
        "~~🎉~~`ñ`",
        "[liên kết](https://vi.example/đường)",
        "é*",
        "*é",
        "[é](",
    ];
    for input in inputs {
        assert_no_blank_items(input);
    }
    assert_eq!(convert("**日本語**")[0].content(), "日本語");
}

#[test]
fn test_whitespace_only_spans() {
    for input in ["** **x", "` `x", "~~\t~~x", "_ _x", "[ ](/a)x"] {
        assert_no_blank_items(input);
    }
}
