//! CSS-like widget selectors
//!
//! A selector is a sequence of simple selectors joined by combinators,
//! resolved against a captured widget tree. Grammar:
//!
//! ```text
//! Selector   = Simple ( Combinator Simple )*
//! Simple     = ( Type | "#" Id | "*" )? Predicate*
//! Predicate  = "[" attr ( "=" | "contains" ) value "]"
//! Combinator = ">" (direct child) | whitespace (descendant)
//! ```
//!
//! `[contains="x"]` is the dedicated text-contains predicate;
//! `[text contains "x"]` is the long form. Values may be quoted or bare.

mod engine;
mod error;
mod parser;
mod token;

#[cfg(test)]
mod tests;

pub use error::SelectorError;
pub use token::{Combinator, SelectorToken, SimpleSelector};

use crate::inspector::{WidgetNode, WidgetTree};

/// Result type for selector operations
pub type Result<T> = std::result::Result<T, SelectorError>;

/// A parsed selector query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) first: SimpleSelector,
    pub(crate) rest: Vec<(Combinator, SimpleSelector)>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a parse error citing the failing position.
    pub fn parse(input: &str) -> Result<Self> {
        parser::parse(input)
    }

    /// The flat token sequence, combinators interleaved
    pub fn tokens(&self) -> Vec<SelectorToken> {
        let mut out = self.first.tokens.clone();
        for (combinator, simple) in &self.rest {
            out.push(match combinator {
                Combinator::DirectChild => SelectorToken::DirectChild,
                Combinator::Descendant => SelectorToken::Descendant,
            });
            out.extend(simple.tokens.iter().cloned());
        }
        out
    }

    /// All nodes matching this selector, in depth-first pre-order.
    ///
    /// The result is deduplicated by id and stable: the same tree always
    /// yields the same sequence.
    pub fn match_all<'t>(&self, tree: &'t WidgetTree) -> Vec<&'t WidgetNode> {
        engine::match_all(self, tree)
    }

    /// The first matching node, if any
    pub fn match_first<'t>(&self, tree: &'t WidgetTree) -> Option<&'t WidgetNode> {
        self.match_all(tree).into_iter().next()
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
