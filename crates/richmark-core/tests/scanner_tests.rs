//! Tests for the token scanner and the link matcher

use richmark_core::link::{is_valid_target, split_title, TitleForm};
use richmark_core::{DiagnosticKind, Scanner, TokenKind};

fn first(text: &str) -> Option<(TokenKind, usize, &str)> {
    Scanner::new(text, 0)
        .next_token()
        .map(|t| (t.kind, t.start, t.content))
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_priority_order() {
    assert!(TokenKind::Link < TokenKind::Code);
    assert!(TokenKind::Code < TokenKind::Bold);
    assert!(TokenKind::Bold < TokenKind::Italic);
    assert!(TokenKind::Italic < TokenKind::Strikethrough);
    assert_eq!(TokenKind::ALL[0], TokenKind::Link);
}

#[test]
fn test_earliest_start_wins_over_priority() {
    assert_eq!(first("~~s~~ [l](/l)"), Some((TokenKind::Strikethrough, 0, "s")));
    assert_eq!(first("x `code` **b**"), Some((TokenKind::Code, 2, "code")));
    assert_eq!(first("*i* **b**"), Some((TokenKind::Italic, 0, "i")));
}

#[test]
fn test_no_token_in_plain_text() {
    assert_eq!(first("nothing to see"), None);
    assert_eq!(first(""), None);
}

#[test]
fn test_bold_is_not_read_as_italic() {
    assert_eq!(first("**b**"), Some((TokenKind::Bold, 0, "b")));
    assert_eq!(first("__b__"), Some((TokenKind::Bold, 0, "b")));
}

#[test]
fn test_italic_may_not_close_on_double_delimiter() {
    assert_eq!(first("*a **b** c*"), Some((TokenKind::Italic, 0, "a **b** c")));
}

#[test]
fn test_blank_candidate_is_skipped() {
    assert_eq!(first("~~ ~~ ~~x~~"), Some((TokenKind::Strikethrough, 6, "x")));
    assert_eq!(first("* * *y*"), Some((TokenKind::Italic, 4, "y")));
}

#[test]
fn test_token_spans_and_raw_text() {
    let token = Scanner::new("ab **cd** ef", 0).next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Bold);
    assert_eq!((token.start, token.end), (3, 9));
    assert_eq!(token.raw, "**cd**");
    assert_eq!(token.content, "cd");
    assert_eq!(token.content_start, 5);
    assert_eq!(token.url, None);
}

#[test]
fn test_scanner_resumes_after_each_token() {
    let mut scanner = Scanner::new("*a* `b` [c](/c)", 0);
    let tokens: Vec<(TokenKind, usize)> = scanner.by_ref().map(|t| (t.kind, t.start)).collect();
    assert_eq!(
        tokens,
        vec![(TokenKind::Italic, 0), (TokenKind::Code, 4), (TokenKind::Link, 8)]
    );
    assert_eq!(scanner.position(), 15);
    assert_eq!(scanner.next_token(), None);
}

#[test]
fn test_rejection_reported_before_the_token_it_precedes() {
    let mut scanner = Scanner::new("*a* [x](bad) *b*", 0);

    let (token, diagnostics) = scanner.next_token_with_diagnostics();
    assert_eq!(token.map(|t| t.start), Some(0));
    assert!(diagnostics.is_empty());

    let (token, diagnostics) = scanner.next_token_with_diagnostics();
    assert_eq!(token.map(|t| (t.kind, t.start)), Some((TokenKind::Italic, 13)));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::InvalidLinkTarget);
}

#[test]
fn test_italic_after_bold_sees_fresh_lookbehind() {
    let kinds: Vec<(TokenKind, &str)> = Scanner::new("**a***b* ", 0)
        .map(|t| (t.kind, t.content))
        .collect();
    assert_eq!(kinds, vec![(TokenKind::Bold, "a"), (TokenKind::Italic, "b")]);
}

// ============================================================================
// Link Matcher
// ============================================================================

#[test]
fn test_link_token_fields() {
    let token = Scanner::new("go [there](https://a.io/x(1) \"T\") now", 0)
        .next_token()
        .unwrap();
    assert_eq!(token.kind, TokenKind::Link);
    assert_eq!(token.start, 3);
    assert_eq!(token.raw, "[there](https://a.io/x(1) \"T\")");
    assert_eq!(token.content, "there");
    assert_eq!(token.url, Some("https://a.io/x(1)"));
    assert_eq!(token.title, TitleForm::Quoted);
}

#[test]
fn test_label_runs_to_first_closing_bracket() {
    let token = Scanner::new("[[a](/a)", 0).next_token().unwrap();
    assert_eq!(token.start, 0);
    assert_eq!(token.content, "[a");
}

#[test]
fn test_failed_link_resumes_after_bracket() {
    let token = Scanner::new("[x] [a](/a)", 0).next_token().unwrap();
    assert_eq!(token.start, 4);
    assert_eq!(token.url, Some("/a"));
}

#[test]
fn test_split_title_forms() {
    assert_eq!(split_title("https://a.io"), ("https://a.io", TitleForm::None));
    assert_eq!(
        split_title("https://a.io \"A title\""),
        ("https://a.io", TitleForm::Quoted)
    );
    assert_eq!(
        split_title("https://a.io\t\"tab\""),
        ("https://a.io", TitleForm::Quoted)
    );
    assert_eq!(
        split_title("https://a.io unquoted"),
        ("https://a.io unquoted", TitleForm::Malformed)
    );
    assert_eq!(
        split_title("https://a.io \"open"),
        ("https://a.io \"open", TitleForm::Malformed)
    );
}

#[test]
fn test_target_validation() {
    assert!(is_valid_target("http://a"));
    assert!(is_valid_target("HTTPS://A"));
    assert!(is_valid_target("tel:+123"));
    assert!(is_valid_target("x-custom.v1+ext:payload"));
    assert!(is_valid_target("/"));
    assert!(is_valid_target("#"));

    assert!(!is_valid_target("1http://a"));
    assert!(!is_valid_target("www.example.com"));
    assert!(!is_valid_target("relative/path"));
    assert!(!is_valid_target("ht tp://a"));
    assert!(!is_valid_target("?q=1"));
}
