//! Grammar contract consumed by the lexer

use super::pattern::{CompiledPattern, PatternError, PatternOptions};
use crate::tokens::{Token, TokenType};

/// Rules and classification hooks of one concrete language.
///
/// The lexer compiles [`catchable_patterns`](Grammar::catchable_patterns) and
/// [`non_catchable_patterns`](Grammar::non_catchable_patterns) into a single
/// [`CompiledPattern`], then runs every catchable match through
/// [`classify`](Grammar::classify) followed by
/// [`is_applicable`](Grammar::is_applicable). A token that is kept must leave
/// `classify` with a type other than [`TokenType::UNDEFINED`].
pub trait Grammar {
    /// Short name used in literal names and log context
    fn name(&self) -> &'static str;

    /// Rules whose matches become tokens, highest priority first
    fn catchable_patterns(&self) -> Vec<String>;

    /// Rules whose matches are consumed and discarded (whitespace and such)
    fn non_catchable_patterns(&self) -> Vec<String>;

    fn pattern_options(&self) -> PatternOptions {
        PatternOptions::default()
    }

    /// Assign a type to a freshly matched token; may also rewrite its text
    fn classify(&self, token: &mut Token);

    /// Whether a classified token is kept in the stream
    fn is_applicable(&self, _token: &Token) -> bool {
        true
    }

    /// Symbolic names of the grammar's token types
    fn type_names(&self) -> &'static [(TokenType, &'static str)] {
        &[]
    }

    fn type_name(&self, ty: TokenType) -> Option<&'static str> {
        self.type_names()
            .iter()
            .find(|(candidate, _)| *candidate == ty)
            .map(|(_, name)| *name)
    }

    fn compile(&self) -> Result<CompiledPattern, PatternError> {
        CompiledPattern::compile(
            &self.catchable_patterns(),
            &self.non_catchable_patterns(),
            self.pattern_options(),
        )
    }
}
