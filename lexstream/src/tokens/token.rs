//! Token value type
//!
//! A token is a classified lexeme: the matched text, the grammar-defined type
//! tag, and the byte offset where the match starts in the original input.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grammar-defined integer tag identifying the kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenType(pub u32);

impl TokenType {
    /// Reserved tag for tokens the grammar has not classified yet
    pub const UNDEFINED: TokenType = TokenType(u32::MAX);

    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    pub const fn tag(self) -> u32 {
        self.0
    }

    pub fn is_undefined(self) -> bool {
        self == Self::UNDEFINED
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            write!(f, "undefined")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A classified lexeme with its source offset.
///
/// Tokens are created unclassified by the tokenizer and handed to the grammar's
/// classification hook, which is the only place [`Token::set_type`] and
/// [`Token::set_text`] are expected to be called. A [`TokenStream`] only gives
/// out shared references, so tokens are read-only once they are in a stream.
///
/// [`TokenStream`]: crate::tokens::TokenStream
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    text: String,
    #[serde(rename = "type")]
    token_type: TokenType,
    offset: usize,
}

impl Token {
    /// Create a token with an explicit type
    pub fn new(text: impl Into<String>, token_type: TokenType, offset: usize) -> Self {
        Self {
            text: text.into(),
            token_type,
            offset,
        }
    }

    /// Create a token that still needs classification
    pub fn unclassified(text: impl Into<String>, offset: usize) -> Self {
        Self::new(text, TokenType::UNDEFINED, offset)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Byte offset of the match start in the original input
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_classified(&self) -> bool {
        !self.token_type.is_undefined()
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    pub fn is_any(&self, types: &[TokenType]) -> bool {
        types.contains(&self.token_type)
    }

    pub fn set_type(&mut self, token_type: TokenType) {
        self.token_type = token_type;
    }

    /// Replace the lexeme text, e.g. with an unescaped string body
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]:{} at {}", self.text, self.token_type, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD: TokenType = TokenType::new(3);
    const NUMBER: TokenType = TokenType::new(4);

    #[test]
    fn test_unclassified_token() {
        let token = Token::unclassified("abc", 10);

        assert!(!token.is_classified());
        assert!(token.token_type().is_undefined());
        assert_eq!(token.offset(), 10);
        assert_eq!(token.to_string(), "[abc]:undefined at 10");
    }

    #[test]
    fn test_classification_updates_type_and_text() {
        let mut token = Token::unclassified("\"a\\\"b\"", 0);
        token.set_type(WORD);
        token.set_text("a\"b");

        assert!(token.is_classified());
        assert!(token.is(WORD));
        assert!(token.is_any(&[NUMBER, WORD]));
        assert!(!token.is_any(&[NUMBER]));
        assert_eq!(token.text(), "a\"b");
        assert_eq!(token.to_string(), "[a\"b]:3 at 0");
    }

    #[test]
    fn test_serializes_type_as_plain_integer() {
        let token = Token::new("42", NUMBER, 7);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"text":"42","type":4,"offset":7}"#);
    }
}
