//! Selector string parser
//!
//! A hand-rolled cursor over the input; every error cites the byte
//! position it was raised at.

use super::error::SelectorError;
use super::token::{Combinator, SelectorToken, SimpleSelector};
use super::{Result, Selector};

/// Parse a selector string
pub fn parse(input: &str) -> Result<Selector> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();

    if cursor.at_end() {
        return Err(SelectorError::parse(0, "empty selector"));
    }

    let first = cursor.parse_simple()?;
    let mut rest = Vec::new();

    loop {
        let had_whitespace = cursor.skip_whitespace();
        if cursor.at_end() {
            break;
        }

        let combinator = if cursor.peek() == Some('>') {
            cursor.advance();
            cursor.skip_whitespace();
            Combinator::DirectChild
        } else if had_whitespace {
            Combinator::Descendant
        } else {
            return Err(SelectorError::parse(
                cursor.position,
                format!("unexpected character '{}'", cursor.peek().unwrap_or(' ')),
            ));
        };

        if cursor.at_end() {
            return Err(SelectorError::parse(
                cursor.position,
                "selector ends after combinator",
            ));
        }

        rest.push((combinator, cursor.parse_simple()?));
    }

    Ok(Selector { first, rest })
}

struct Cursor<'a> {
    input: &'a str,
    chars: Vec<char>,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Skip whitespace; true when at least one character was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        self.position > start
    }

    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            self.position += 1;
        }

        if self.position == start {
            return Err(SelectorError::parse(start, "expected identifier"));
        }

        Ok(self.chars[start..self.position].iter().collect())
    }

    /// Simple = ( Type | "#" Id | "*" )? Predicate*
    fn parse_simple(&mut self) -> Result<SimpleSelector> {
        let start = self.position;
        let mut tokens = Vec::new();
        let mut universal = false;

        match self.peek() {
            Some('*') => {
                self.advance();
                universal = true;
            }
            Some('#') => {
                self.advance();
                tokens.push(SelectorToken::Id(self.parse_identifier()?));
            }
            Some(c) if c.is_alphanumeric() || c == '_' => {
                tokens.push(SelectorToken::Type(self.parse_identifier()?));
            }
            _ => {}
        }

        while self.peek() == Some('[') {
            tokens.push(self.parse_predicate()?);
        }

        if tokens.is_empty() && !universal {
            return Err(SelectorError::parse(
                start,
                format!("expected selector, found '{}'", self.peek().unwrap_or(' ')),
            ));
        }

        Ok(SimpleSelector { tokens })
    }

    /// Predicate = "[" attr ( "=" | "contains" ) value "]"
    fn parse_predicate(&mut self) -> Result<SelectorToken> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let attr = self.parse_identifier()?;
        self.skip_whitespace();

        let op_position = self.position;
        let contains_op = if self.peek() == Some('=') {
            self.advance();
            false
        } else {
            let word = self.parse_identifier().map_err(|_| {
                SelectorError::parse(op_position, "expected '=' or 'contains'")
            })?;
            if word != "contains" {
                return Err(SelectorError::parse(
                    op_position,
                    format!("unknown operator '{word}'"),
                ));
            }
            true
        };

        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();

        if self.advance() != Some(']') {
            return Err(SelectorError::parse(self.position, "expected ']'"));
        }

        // The `contains` operator is only defined for text; `[contains=x]`
        // is the dedicated text-contains shorthand.
        if contains_op {
            if attr == "text" || attr == "contains" {
                return Ok(SelectorToken::TextContains(value));
            }
            return Err(SelectorError::parse(
                op_position,
                format!("'contains' is not supported for attribute '{attr}'"),
            ));
        }

        if attr == "contains" {
            Ok(SelectorToken::TextContains(value))
        } else if attr == "text" {
            Ok(SelectorToken::TextEquals(value))
        } else {
            Ok(SelectorToken::PropertyEquals(attr, value))
        }
    }

    /// A predicate value: quoted (with `\"` escapes) or bare up to `]`
    fn parse_value(&mut self) -> Result<String> {
        if self.peek() == Some('"') {
            let open = self.position;
            self.advance();
            let mut value = String::new();

            loop {
                match self.advance() {
                    Some('"') => return Ok(value),
                    Some('\\') => match self.advance() {
                        Some(c) => value.push(c),
                        None => {
                            return Err(SelectorError::parse(open, "unterminated string"));
                        }
                    },
                    Some(c) => value.push(c),
                    None => return Err(SelectorError::parse(open, "unterminated string")),
                }
            }
        }

        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c != ']' && !c.is_whitespace())
        {
            self.position += 1;
        }

        if self.position == start {
            return Err(SelectorError::parse(start, "expected value"));
        }

        Ok(self.chars[start..self.position].iter().collect())
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cursor({:?} @ {})", self.input, self.position)
    }
}
