//! Selector token model

use serde_json::Value;

use crate::inspector::WidgetNode;

/// One component of a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorToken {
    /// Match the widget class name (case-sensitive)
    Type(String),
    /// Match the node id
    Id(String),
    /// Match exact text content
    TextEquals(String),
    /// Match a substring of the text content
    TextContains(String),
    /// Match a diagnostic property, stringified
    PropertyEquals(String, String),
    /// Combinator: previous simple must be the parent
    DirectChild,
    /// Combinator: previous simple must be an ancestor
    Descendant,
}

impl SelectorToken {
    /// Whether this token matches a node. Combinators never match
    /// directly; they are handled by the evaluation loop.
    pub fn matches(&self, node: &WidgetNode) -> bool {
        match self {
            Self::Type(name) => node.widget_type == *name,
            Self::Id(id) => node.id == *id,
            Self::TextEquals(value) => node.text.as_deref() == Some(value.as_str()),
            Self::TextContains(substring) => node
                .text
                .as_deref()
                .is_some_and(|text| text.contains(substring.as_str())),
            Self::PropertyEquals(name, value) => node
                .properties
                .get(name)
                .is_some_and(|v| stringify(v) == *value),
            Self::DirectChild | Self::Descendant => false,
        }
    }
}

/// How two simple selectors relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: immediate parent
    DirectChild,
}

/// A simple selector: optional type/id plus predicates.
///
/// An empty token list is the universal selector (`*`), matching any node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSelector {
    /// Matcher tokens (never combinators)
    pub tokens: Vec<SelectorToken>,
}

impl SimpleSelector {
    /// Whether every component matches the node
    pub fn matches(&self, node: &WidgetNode) -> bool {
        self.tokens.iter().all(|token| token.matches(node))
    }
}

/// Render a property value the way selector values are compared: bare
/// strings stay as-is, scalars print canonically.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
