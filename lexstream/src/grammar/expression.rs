//! Reference grammar for small arithmetic and assignment expressions
//!
//! Recognizes identifiers, integer and float literals, double-quoted strings
//! with backslash escapes, `//` line comments and single-character operators.
//! Whitespace is skipped, comments are classified and then dropped.

use crate::lexical::Grammar;
use crate::tokens::{Token, TokenType};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionGrammar;

impl ExpressionGrammar {
    pub const IDENT: TokenType = TokenType::new(1);
    pub const INT: TokenType = TokenType::new(2);
    pub const FLOAT: TokenType = TokenType::new(3);
    pub const STRING: TokenType = TokenType::new(4);
    pub const EQ: TokenType = TokenType::new(10);
    pub const PLUS: TokenType = TokenType::new(11);
    pub const MINUS: TokenType = TokenType::new(12);
    pub const STAR: TokenType = TokenType::new(13);
    pub const SLASH: TokenType = TokenType::new(14);
    pub const LPAREN: TokenType = TokenType::new(20);
    pub const RPAREN: TokenType = TokenType::new(21);
    pub const LBRACE: TokenType = TokenType::new(22);
    pub const RBRACE: TokenType = TokenType::new(23);
    pub const COMMA: TokenType = TokenType::new(24);
    pub const SEMICOLON: TokenType = TokenType::new(25);
    pub const COMMENT: TokenType = TokenType::new(30);

    pub fn new() -> Self {
        Self
    }

    fn punctuation(c: char) -> Option<TokenType> {
        let ty = match c {
            '=' => Self::EQ,
            '+' => Self::PLUS,
            '-' => Self::MINUS,
            '*' => Self::STAR,
            '/' => Self::SLASH,
            '(' => Self::LPAREN,
            ')' => Self::RPAREN,
            '{' => Self::LBRACE,
            '}' => Self::RBRACE,
            ',' => Self::COMMA,
            ';' => Self::SEMICOLON,
            _ => return None,
        };
        Some(ty)
    }
}

const TYPE_NAMES: &[(TokenType, &str)] = &[
    (ExpressionGrammar::IDENT, "IDENT"),
    (ExpressionGrammar::INT, "INT"),
    (ExpressionGrammar::FLOAT, "FLOAT"),
    (ExpressionGrammar::STRING, "STRING"),
    (ExpressionGrammar::EQ, "EQ"),
    (ExpressionGrammar::PLUS, "PLUS"),
    (ExpressionGrammar::MINUS, "MINUS"),
    (ExpressionGrammar::STAR, "STAR"),
    (ExpressionGrammar::SLASH, "SLASH"),
    (ExpressionGrammar::LPAREN, "LPAREN"),
    (ExpressionGrammar::RPAREN, "RPAREN"),
    (ExpressionGrammar::LBRACE, "LBRACE"),
    (ExpressionGrammar::RBRACE, "RBRACE"),
    (ExpressionGrammar::COMMA, "COMMA"),
    (ExpressionGrammar::SEMICOLON, "SEMICOLON"),
    (ExpressionGrammar::COMMENT, "COMMENT"),
];

impl Grammar for ExpressionGrammar {
    fn name(&self) -> &'static str {
        "Expression"
    }

    fn catchable_patterns(&self) -> Vec<String> {
        vec![
            r#""(?:[^"\\]|\\.)*""#.to_string(),
            r"//[^\n]*".to_string(),
            r"[0-9]+\.[0-9]+(?:e[+-]?[0-9]+)?".to_string(),
            r"[0-9]+".to_string(),
            r"[a-z_][a-z0-9_]*".to_string(),
            r"[=+\-*/(){},;]".to_string(),
        ]
    }

    fn non_catchable_patterns(&self) -> Vec<String> {
        vec![r"\s+".to_string()]
    }

    fn classify(&self, token: &mut Token) {
        let text = token.text();
        let Some(first) = text.chars().next() else {
            return;
        };

        if first == '"' {
            let body = &text[1..text.len().saturating_sub(1).max(1)];
            let unescaped = unescape(body);
            token.set_type(Self::STRING);
            token.set_text(unescaped);
        } else if text.starts_with("//") {
            token.set_type(Self::COMMENT);
        } else if first.is_ascii_digit() {
            let ty = if text.contains('.') { Self::FLOAT } else { Self::INT };
            token.set_type(ty);
        } else if first.is_alphabetic() || first == '_' {
            token.set_type(Self::IDENT);
        } else if let Some(ty) = Self::punctuation(first) {
            token.set_type(ty);
        }
    }

    fn is_applicable(&self, token: &Token) -> bool {
        !token.is(Self::COMMENT)
    }

    fn type_names(&self) -> &'static [(TokenType, &'static str)] {
        TYPE_NAMES
    }
}

/// Resolve backslash escapes inside a string literal body
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::Lexer;

    type G = ExpressionGrammar;

    fn kinds(input: &str) -> Vec<(String, TokenType)> {
        Lexer::new(G::new())
            .unwrap()
            .tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| (t.text().to_string(), t.token_type()))
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("12 3.5 1.0e-3"),
            vec![
                ("12".to_string(), G::INT),
                ("3.5".to_string(), G::FLOAT),
                ("1.0e-3".to_string(), G::FLOAT),
            ]
        );
    }

    #[test]
    fn test_identifiers_are_case_insensitive() {
        assert_eq!(
            kinds("Foo _bar x1"),
            vec![
                ("Foo".to_string(), G::IDENT),
                ("_bar".to_string(), G::IDENT),
                ("x1".to_string(), G::IDENT),
            ]
        );
    }

    #[test]
    fn test_strings_are_unescaped() {
        let tokens = kinds(r#"s = "a\"b\n" + "" "#);
        assert_eq!(tokens[2], ("a\"b\n".to_string(), G::STRING));
        assert_eq!(tokens[4], (String::new(), G::STRING));
    }

    #[test]
    fn test_comments_are_dropped() {
        let tokens = kinds("a / b // trailing note\nc");
        let types: Vec<_> = tokens.iter().map(|(_, ty)| *ty).collect();
        assert_eq!(types, vec![G::IDENT, G::SLASH, G::IDENT, G::IDENT]);
    }

    #[test]
    fn test_punctuation() {
        let types: Vec<_> = kinds("f(a, b) { x; } - *")
            .into_iter()
            .map(|(_, ty)| ty)
            .collect();
        assert_eq!(
            types,
            vec![
                G::IDENT,
                G::LPAREN,
                G::IDENT,
                G::COMMA,
                G::IDENT,
                G::RPAREN,
                G::LBRACE,
                G::IDENT,
                G::SEMICOLON,
                G::RBRACE,
                G::MINUS,
                G::STAR,
            ]
        );
    }

    #[test]
    fn test_every_type_has_a_name() {
        let grammar = G::new();
        for ty in [G::IDENT, G::STRING, G::SEMICOLON, G::COMMENT] {
            assert!(grammar.type_name(ty).is_some());
        }
        assert_eq!(grammar.type_names().len(), 16);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"tab\there"), "tab\there");
        assert_eq!(unescape(r"q\q"), "qq");
        assert_eq!(unescape("end\\"), "end\\");
    }
}
