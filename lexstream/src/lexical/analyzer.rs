//! Grammar-driven lexer
//!
//! Runs a grammar's compiled pattern over an input, classifies and filters the
//! catchable matches, and owns the resulting [`TokenStream`].

use super::grammar::Grammar;
use super::pattern::{CompiledPattern, PatternError};
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream, TokenType};
use crate::{log_debug, log_error, log_success};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Lexical analysis errors with compile-time limits
#[derive(Debug, Clone, thiserror::Error)]
pub enum LexerError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Token '{text}' at byte {offset} was kept without a type")]
    UnclassifiedToken { text: String, offset: usize },

    #[error("Input too large: {size} bytes (max {MAX_INPUT_SIZE})")]
    InputTooLarge { size: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Pattern(error) => error.error_code(),
            LexerError::UnclassifiedToken { .. } => codes::lexical::UNCLASSIFIED_TOKEN,
            LexerError::InputTooLarge { .. } => codes::lexical::INPUT_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Byte offset in the input the error points at, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexerError::Pattern(PatternError::UnmatchedInput { offset, .. }) => Some(*offset),
            LexerError::UnclassifiedToken { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Counters for the most recent tokenization
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub skipped_spans: usize,
    pub filtered_tokens: usize,
    pub input_bytes: usize,

    // Runtime preference-controlled metrics
    pub type_counts: BTreeMap<TokenType, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if preferences.collect_type_counts {
            *self.type_counts.entry(token.token_type()).or_insert(0) += 1;
        }
    }

    pub fn count_of(&self, ty: TokenType) -> usize {
        self.type_counts.get(&ty).copied().unwrap_or(0)
    }
}

/// Lexer bound to one grammar and owning the stream of the current input
pub struct Lexer<G> {
    grammar: G,
    pattern: Arc<CompiledPattern>,
    stream: TokenStream,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    max_peek_steps: usize,
}

impl<G: Grammar> Lexer<G> {
    /// Compile the grammar's pattern and create a lexer with an empty stream
    pub fn new(grammar: G) -> Result<Self, LexerError> {
        let pattern = grammar.compile()?;
        Ok(Self::with_pattern(grammar, Arc::new(pattern)))
    }

    /// Create a lexer reusing an already compiled pattern
    pub fn with_pattern(grammar: G, pattern: Arc<CompiledPattern>) -> Self {
        Self {
            grammar,
            pattern,
            stream: TokenStream::empty(),
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
            max_peek_steps: DEFAULT_MAX_PEEK_STEPS,
        }
    }

    pub fn with_preferences(mut self, preferences: LexicalPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Lookahead cap applied to every stream this lexer builds
    pub fn with_max_peek_steps(mut self, steps: usize) -> Self {
        self.max_peek_steps = steps.max(1);
        self.stream = std::mem::take(&mut self.stream).with_max_peek_steps(self.max_peek_steps);
        self
    }

    /// Tokenize `input` without touching the lexer's stream
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexerError> {
        self.run(input).map(|(tokens, _)| tokens)
    }

    /// Replace the stream with the tokens of `input`.
    ///
    /// Both cursors start over. On error the stream is left empty.
    pub fn set_input(&mut self, input: impl Into<String>) -> Result<(), LexerError> {
        let input = input.into();

        match self.run(&input) {
            Ok((tokens, metrics)) => {
                self.stream = TokenStream::new(input, tokens).with_max_peek_steps(self.max_peek_steps);
                self.metrics = metrics;
                Ok(())
            }
            Err(error) => {
                self.stream = TokenStream::empty().with_max_peek_steps(self.max_peek_steps);
                self.metrics = LexicalMetrics::default();
                Err(error)
            }
        }
    }

    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut TokenStream {
        &mut self.stream
    }

    pub fn into_stream(self) -> TokenStream {
        self.stream
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Shared handle to the compiled pattern, for building sibling lexers
    pub fn pattern(&self) -> &Arc<CompiledPattern> {
        &self.pattern
    }

    /// Metrics of the last successful `set_input`
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Symbolic name of a token type, e.g. `Expression::IDENT`
    pub fn literal(&self, ty: TokenType) -> String {
        match self.grammar.type_name(ty) {
            Some(name) => format!("{}::{}", self.grammar.name(), name),
            None => ty.to_string(),
        }
    }

    fn run(&self, input: &str) -> Result<(Vec<Token>, LexicalMetrics), LexerError> {
        log_debug!("Starting lexical analysis",
            "grammar" => self.grammar.name(),
            "input_bytes" => input.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        if input.len() > MAX_INPUT_SIZE {
            return Err(self.report(LexerError::InputTooLarge { size: input.len() }));
        }

        let matches = self
            .pattern
            .scan(input)
            .map_err(|error| self.report(error.into()))?;

        let mut metrics = LexicalMetrics {
            input_bytes: input.len(),
            ..LexicalMetrics::default()
        };
        let mut tokens = Vec::new();

        for raw in matches {
            if !raw.catchable {
                metrics.skipped_spans += 1;
                continue;
            }

            let mut token = Token::unclassified(raw.text, raw.offset);
            self.grammar.classify(&mut token);

            if !self.grammar.is_applicable(&token) {
                metrics.filtered_tokens += 1;
                continue;
            }

            if !token.is_classified() {
                return Err(self.report(LexerError::UnclassifiedToken {
                    text: token.text().to_string(),
                    offset: token.offset(),
                }));
            }

            if tokens.len() >= MAX_TOKEN_COUNT {
                return Err(self.report(LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                }));
            }

            metrics.record_token(&token, &self.preferences);
            tokens.push(token);
        }

        if self.preferences.log_token_summary {
            log_success!(codes::success::TOKENIZATION_COMPLETE,
                "Lexical analysis completed successfully",
                "grammar" => self.grammar.name(),
                "token_count" => metrics.total_tokens,
                "skipped_spans" => metrics.skipped_spans,
                "filtered_tokens" => metrics.filtered_tokens,
                "input_bytes" => metrics.input_bytes
            );
        }

        Ok((tokens, metrics))
    }

    fn report(&self, error: LexerError) -> LexerError {
        let message = error.to_string();
        let offset = error
            .offset()
            .filter(|_| self.preferences.include_offsets_in_errors);

        match offset {
            Some(offset) => log_error!(error.error_code(), &message,
                offset = offset,
                "grammar" => self.grammar.name()
            ),
            None => log_error!(error.error_code(), &message,
                "grammar" => self.grammar.name()
            ),
        }

        error
    }
}
