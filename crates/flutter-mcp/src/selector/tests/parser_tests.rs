//! Tests for selector parsing

use crate::selector::{Selector, SelectorError, SelectorToken};

fn tokens(input: &str) -> Vec<SelectorToken> {
    Selector::parse(input).unwrap().tokens()
}

#[test]
fn test_type_selector() {
    assert_eq!(tokens("Button"), vec![SelectorToken::Type("Button".into())]);
}

#[test]
fn test_id_selector() {
    assert_eq!(tokens("#c"), vec![SelectorToken::Id("c".into())]);
}

#[test]
fn test_universal_selector() {
    let selector = Selector::parse("*").unwrap();
    assert!(selector.tokens().is_empty());
    assert!(selector.rest.is_empty());
}

#[test]
fn test_text_equals_predicate() {
    assert_eq!(
        tokens(r#"Button[text="OK"]"#),
        vec![
            SelectorToken::Type("Button".into()),
            SelectorToken::TextEquals("OK".into()),
        ]
    );
}

#[test]
fn test_contains_shorthand() {
    assert_eq!(
        tokens(r#"[contains="load"]"#),
        vec![SelectorToken::TextContains("load".into())]
    );
}

#[test]
fn test_text_contains_long_form() {
    assert_eq!(
        tokens(r#"[text contains "load"]"#),
        vec![SelectorToken::TextContains("load".into())]
    );
}

#[test]
fn test_property_predicate() {
    assert_eq!(
        tokens(r#"Checkbox[value="true"]"#),
        vec![
            SelectorToken::Type("Checkbox".into()),
            SelectorToken::PropertyEquals("value".into(), "true".into()),
        ]
    );
}

#[test]
fn test_bare_value() {
    assert_eq!(
        tokens("[value=true]"),
        vec![SelectorToken::PropertyEquals("value".into(), "true".into())]
    );
}

#[test]
fn test_escaped_quote_in_value() {
    assert_eq!(
        tokens(r#"[text="say \"hi\""]"#),
        vec![SelectorToken::TextEquals(r#"say "hi""#.into())]
    );
}

#[test]
fn test_descendant_combinator() {
    assert_eq!(
        tokens("Column Text"),
        vec![
            SelectorToken::Type("Column".into()),
            SelectorToken::Descendant,
            SelectorToken::Type("Text".into()),
        ]
    );
}

#[test]
fn test_direct_child_combinator() {
    assert_eq!(
        tokens("Column > Text"),
        vec![
            SelectorToken::Type("Column".into()),
            SelectorToken::DirectChild,
            SelectorToken::Type("Text".into()),
        ]
    );
}

#[test]
fn test_direct_child_without_spaces() {
    assert_eq!(tokens("Column>Text"), tokens("Column > Text"));
}

#[test]
fn test_compound_query() {
    assert_eq!(
        tokens(r#"Scaffold ListView > ListTile[text contains "Item"]"#),
        vec![
            SelectorToken::Type("Scaffold".into()),
            SelectorToken::Descendant,
            SelectorToken::Type("ListView".into()),
            SelectorToken::DirectChild,
            SelectorToken::Type("ListTile".into()),
            SelectorToken::TextContains("Item".into()),
        ]
    );
}

#[test]
fn test_multiple_predicates() {
    assert_eq!(
        tokens(r#"Button[text="OK"][enabled=true]"#),
        vec![
            SelectorToken::Type("Button".into()),
            SelectorToken::TextEquals("OK".into()),
            SelectorToken::PropertyEquals("enabled".into(), "true".into()),
        ]
    );
}

#[test]
fn test_empty_selector_rejected() {
    assert!(Selector::parse("").is_err());
    assert!(Selector::parse("   ").is_err());
}

#[test]
fn test_trailing_combinator_rejected() {
    assert!(Selector::parse("Column >").is_err());
}

#[test]
fn test_unterminated_string_rejected() {
    assert!(Selector::parse(r#"[text="oops]"#).is_err());
}

#[test]
fn test_missing_bracket_rejected() {
    assert!(Selector::parse(r#"[text="x""#).is_err());
}

#[test]
fn test_unknown_operator_rejected() {
    assert!(Selector::parse("[text startswith \"x\"]").is_err());
}

#[test]
fn test_contains_on_property_rejected() {
    let err = Selector::parse(r#"[value contains "x"]"#).unwrap_err();
    let SelectorError::Parse { message, .. } = err;
    assert!(message.contains("not supported"), "got: {message}");
}

#[test]
fn test_error_cites_position() {
    let err = Selector::parse("Button[").unwrap_err();
    let SelectorError::Parse { position, .. } = err;
    assert!(position >= 7, "position was {position}");
}

#[test]
fn test_from_str() {
    let selector: Selector = "Button".parse().unwrap();
    assert_eq!(selector.tokens(), vec![SelectorToken::Type("Button".into())]);
}
