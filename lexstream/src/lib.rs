//! Regex-driven tokenizer with a navigable token stream
//!
//! A [`Grammar`] supplies catchable and skip rules plus classification hooks.
//! A [`Lexer`] compiles those rules once, tokenizes input into a
//! [`TokenStream`], and the stream's cursor API drives hand-written parsers.

// Internal modules
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::ExpressionGrammar;
pub use lexical::{
    CompiledPattern, Grammar, Lexer, LexerError, LexicalMetrics, PatternError, PatternOptions,
    RawMatch,
};
pub use tokens::{Checkpoint, Token, TokenStream, TokenType};
pub use utils::{Position, SourceMap};
