//! Lexical analysis module
//!
//! Compiles a [`Grammar`]'s rules into a single [`CompiledPattern`] and turns
//! input text into a [`TokenStream`] through a [`Lexer`].
//!

pub mod analyzer;
pub mod grammar;
pub mod pattern;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

pub use analyzer::{Lexer, LexerError, LexicalMetrics};
pub use grammar::Grammar;
pub use pattern::{CompiledPattern, PatternError, PatternOptions, RawMatch};

// ============================================================================
// MODULE API
// ============================================================================

/// Tokenize `input` with a one-off lexer and return its stream
pub fn tokenize<G: Grammar>(grammar: G, input: &str) -> Result<TokenStream, LexerError> {
    let mut lexer = Lexer::new(grammar)?;
    lexer.set_input(input)?;
    Ok(lexer.into_stream())
}

/// Tokenize with custom runtime preferences
pub fn tokenize_with_preferences<G: Grammar>(
    grammar: G,
    input: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    let mut lexer = Lexer::new(grammar)?.with_preferences(preferences);
    lexer.set_input(input)?;
    Ok(lexer.into_stream())
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Check that every lexical error code is registered with metadata
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let error_codes = [
        crate::logging::codes::pattern::EMPTY_RULE_SET,
        crate::logging::codes::pattern::INVALID_PATTERN,
        crate::logging::codes::lexical::UNMATCHED_INPUT,
        crate::logging::codes::lexical::UNCLASSIFIED_TOKEN,
        crate::logging::codes::lexical::INPUT_TOO_LARGE,
        crate::logging::codes::lexical::TOO_MANY_TOKENS,
        crate::logging::codes::success::PATTERN_COMPILED,
        crate::logging::codes::success::TOKENIZATION_COMPLETE,
    ];

    for code in &error_codes {
        if crate::logging::codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    crate::log_debug!("Lexical limits initialized",
        "max_input_size" => MAX_INPUT_SIZE,
        "max_token_count" => MAX_TOKEN_COUNT,
        "default_max_peek_steps" => DEFAULT_MAX_PEEK_STEPS,
        "max_fragment_preview" => MAX_FRAGMENT_PREVIEW
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_codes_are_registered() {
        assert!(init_lexical_analysis_logging().is_ok());
    }
}
