//! Cursor-based token stream navigation
//!
//! The stream owns the tokens produced for one input together with the input
//! itself, so diagnostics can map offsets back to lines and columns. Navigation
//! is total: moving past either end leaves the cursor in an exhausted state
//! where every accessor yields `None` and every predicate yields `false`.

use crate::{
    config::compile_time::lexical::DEFAULT_MAX_PEEK_STEPS,
    tokens::token::{Token, TokenType},
    utils::{Position, SourceMap},
};

/// Saved cursor position for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    position: isize,
}

/// Token sequence with a primary cursor and a bounded, resettable peek cursor.
///
/// The primary cursor ranges over `-1..=len`; both ends are exhausted states.
/// The peek cursor is an offset from the primary cursor and is cleared by every
/// movement of the primary cursor.
#[derive(Debug, Clone)]
pub struct TokenStream {
    input: String,
    tokens: Vec<Token>,
    position: isize,
    peek_offset: usize,
    max_peek_steps: usize,
    peek_limit: usize,
    source_map: SourceMap,
}

impl TokenStream {
    /// Create a stream over `tokens` with the cursor on the first token
    pub fn new(input: impl Into<String>, tokens: Vec<Token>) -> Self {
        let input = input.into();
        let source_map = SourceMap::new(&input);

        crate::log_debug!("Token stream created",
            "tokens" => tokens.len(),
            "input_len" => input.len()
        );

        Self {
            input,
            tokens,
            position: 0,
            peek_offset: 0,
            max_peek_steps: DEFAULT_MAX_PEEK_STEPS,
            peek_limit: DEFAULT_MAX_PEEK_STEPS,
            source_map,
        }
    }

    /// Stream with no input and no tokens
    pub fn empty() -> Self {
        Self::new(String::new(), Vec::new())
    }

    /// Override the lookahead cap; at least one step is always allowed
    pub fn with_max_peek_steps(mut self, steps: usize) -> Self {
        self.max_peek_steps = steps.max(1);
        self.peek_limit = self.max_peek_steps;
        self.peek_offset = self.peek_offset.min(self.max_peek_steps);
        self
    }

    fn token_at(&self, index: isize) -> Option<&Token> {
        if index < 0 {
            None
        } else {
            self.tokens.get(index as usize)
        }
    }

    fn upper_bound(&self) -> isize {
        self.tokens.len() as isize
    }

    // === CORE NAVIGATION ===

    /// Move the cursor to the first token and clear the peek cursor
    pub fn reset(&mut self) {
        self.position = 0;
        self.reset_peek();
    }

    /// Move one token forward; returns whether the cursor is on a token
    pub fn advance(&mut self) -> bool {
        if self.position < self.upper_bound() {
            self.position += 1;
        }
        self.reset_peek();
        self.is_valid()
    }

    /// Move one token backward; returns whether the cursor is on a token
    pub fn retreat(&mut self) -> bool {
        if self.position >= 0 {
            self.position -= 1;
        }
        self.reset_peek();
        self.is_valid()
    }

    pub fn is_valid(&self) -> bool {
        self.current_token().is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next_token().is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous_token().is_some()
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.token_at(self.position)
    }

    pub fn next_token(&self) -> Option<&Token> {
        self.token_at(self.position + 1)
    }

    pub fn previous_token(&self) -> Option<&Token> {
        self.token_at(self.position - 1)
    }

    /// Text of the current token
    pub fn token_text(&self) -> Option<&str> {
        self.current_token().map(Token::text)
    }

    /// Type of the current token
    pub fn token_type(&self) -> Option<TokenType> {
        self.current_token().map(Token::token_type)
    }

    /// Byte offset of the current token
    pub fn token_offset(&self) -> Option<usize> {
        self.current_token().map(Token::offset)
    }

    // === BOUNDED LOOKAHEAD ===

    /// Step the peek cursor forward (up to the cap) and return the token under it.
    ///
    /// Successive calls return the tokens after the current one; once the cap is
    /// reached further calls keep returning the token at the cap. After an
    /// unreset [`peek_beyond`](Self::peek_beyond) the cap is the token just past
    /// the landed one when that lies further out.
    pub fn peek(&mut self) -> Option<&Token> {
        if self.peek_offset < self.peek_limit {
            self.peek_offset += 1;
        }
        self.token_at(self.position + self.peek_offset as isize)
    }

    pub fn reset_peek(&mut self) {
        self.peek_offset = 0;
        self.peek_limit = self.max_peek_steps;
    }

    /// Place the peek cursor `steps` tokens ahead, clamped to the cap
    pub fn set_peek(&mut self, steps: usize) {
        self.peek_limit = self.max_peek_steps;
        self.peek_offset = steps.min(self.max_peek_steps);
    }

    pub fn peek_offset(&self) -> usize {
        self.peek_offset
    }

    pub fn max_peek_steps(&self) -> usize {
        self.max_peek_steps
    }

    /// Find the closer that balances the nesting started at the peek cursor.
    ///
    /// The scan begins with the token under the peek cursor (the current token
    /// when nothing has been peeked) and that token counts toward the depth.
    /// Every `opener` raises the depth, every `closer` lowers it, and the first
    /// closer that brings the depth to zero or below is returned. Other tokens
    /// are stepped over. The scan is bounded only by the end of the stream.
    ///
    /// Unless `reset_peek` is set, the peek cursor is left on the returned
    /// token, or past the end of the stream when no closer balanced. The next
    /// [`peek`](Self::peek) then returns the token after the landed one however
    /// far out it is, and later peeks stay on that token until the peek cursor
    /// is reset or the primary cursor moves. Opener and closer are checked in
    /// that order, so equal types never balance and the scan returns `None`.
    pub fn peek_beyond(
        &mut self,
        opener: TokenType,
        closer: TokenType,
        reset_peek: bool,
    ) -> Option<&Token> {
        let start = (self.position + self.peek_offset as isize).max(0) as usize;
        let mut depth: i64 = 0;
        let mut found = None;

        for (index, token) in self.tokens.iter().enumerate().skip(start) {
            if token.is(opener) {
                depth += 1;
            } else if token.is(closer) {
                depth -= 1;
                if depth <= 0 {
                    found = Some(index);
                    break;
                }
            }
        }

        if reset_peek {
            self.reset_peek();
        } else {
            let landed = found.unwrap_or(self.tokens.len()) as isize;
            self.peek_offset = (landed - self.position).max(0) as usize;
            self.peek_limit = self.max_peek_steps.max(self.peek_offset + 1);
        }

        found.and_then(|index| self.tokens.get(index))
    }

    // === PREDICATE SEARCH ===

    /// Step forward until the current token has type `ty`.
    ///
    /// The starting token is never considered. Returns the landed token, or
    /// `None` with the cursor exhausted.
    pub fn forward_to(&mut self, ty: TokenType) -> Option<&Token> {
        while self.advance() {
            if self.is_current(ty) {
                return self.current_token();
            }
        }
        None
    }

    /// Step backward until the current token has type `ty`
    pub fn backward_to(&mut self, ty: TokenType) -> Option<&Token> {
        while self.retreat() {
            if self.is_current(ty) {
                return self.current_token();
            }
        }
        None
    }

    pub fn advance_if_next(&mut self, ty: TokenType) -> bool {
        self.advance_if_next_any(&[ty])
    }

    /// Advance one token only when the next token has one of `types`
    pub fn advance_if_next_any(&mut self, types: &[TokenType]) -> bool {
        if self.is_next_any(types) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn retreat_if_previous(&mut self, ty: TokenType) -> bool {
        self.retreat_if_previous_any(&[ty])
    }

    pub fn retreat_if_previous_any(&mut self, types: &[TokenType]) -> bool {
        if self.is_previous_any(types) {
            self.retreat();
            true
        } else {
            false
        }
    }

    pub fn is_current(&self, ty: TokenType) -> bool {
        self.current_token().is_some_and(|t| t.is(ty))
    }

    pub fn is_current_any(&self, types: &[TokenType]) -> bool {
        self.current_token().is_some_and(|t| t.is_any(types))
    }

    pub fn is_next(&self, ty: TokenType) -> bool {
        self.next_token().is_some_and(|t| t.is(ty))
    }

    pub fn is_next_any(&self, types: &[TokenType]) -> bool {
        self.next_token().is_some_and(|t| t.is_any(types))
    }

    pub fn is_previous(&self, ty: TokenType) -> bool {
        self.previous_token().is_some_and(|t| t.is(ty))
    }

    pub fn is_previous_any(&self, types: &[TokenType]) -> bool {
        self.previous_token().is_some_and(|t| t.is_any(types))
    }

    /// Whether `ty` occurs among the next `limit` tokens after the cursor
    pub fn is_token_nearby(&self, ty: TokenType, limit: usize) -> bool {
        let limit = limit.min(self.remaining_count());
        (1..=limit).any(|distance| {
            self.token_at(self.position + distance as isize)
                .is_some_and(|t| t.is(ty))
        })
    }

    /// Advance until the current token has type `ty`, starting with the current one
    pub fn skip_until(&mut self, ty: TokenType) -> bool {
        while self.is_valid() {
            if self.is_current(ty) {
                return true;
            }
            self.advance();
        }
        false
    }

    /// Token `n` positions after the cursor, without touching either cursor
    pub fn lookahead(&self, n: usize) -> Option<&Token> {
        let n = isize::try_from(n).ok()?;
        self.token_at(self.position.checked_add(n)?)
    }

    // === BACKTRACKING ===

    /// Save current position as checkpoint for backtracking
    pub fn save_position(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
        }
    }

    /// Restore position from checkpoint
    pub fn restore_position(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position.clamp(-1, self.upper_bound());
        self.reset_peek();
    }

    // === ACCESSORS ===

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current token, `None` when exhausted
    pub fn current_index(&self) -> Option<usize> {
        self.is_valid().then_some(self.position as usize)
    }

    pub fn remaining_count(&self) -> usize {
        (self.upper_bound() - self.position.max(0)).max(0) as usize
    }

    // === DEBUGGING AND DIAGNOSTICS ===

    /// Line and column of a token of this stream
    pub fn location_of(&self, token: &Token) -> Position {
        self.source_map.position_at(&self.input, token.offset())
    }

    /// Source line containing `token`, without its terminator
    pub fn line_of(&self, token: &Token) -> Option<&str> {
        let location = self.location_of(token);
        self.source_map.get_line(&self.input, location.line)
    }

    /// One-line summary of the cursor state
    pub fn diagnostic(&self) -> String {
        let current_info = match self.current_token() {
            Some(token) => format!("{} ({})", token, self.location_of(token)),
            None => "<exhausted>".to_string(),
        };

        format!(
            "TokenStream(pos: {}/{}, peek: {}, current: {})",
            self.position,
            self.tokens.len(),
            self.peek_offset,
            current_info
        )
    }

    /// Tokens within `radius` positions of the cursor
    pub fn context_snippet(&self, radius: usize) -> Vec<&Token> {
        let center = self.position.clamp(0, self.upper_bound());
        let radius = radius.min(self.tokens.len());
        let start = (center - radius as isize).max(0);
        let end = (center + radius as isize + 1).min(self.upper_bound());

        (start..end).filter_map(|index| self.token_at(index)).collect()
    }
}

impl Default for TokenStream {
    fn default() -> Self {
        Self::empty()
    }
}

/// Consuming iteration from the cursor to the end of the stream.
///
/// A cursor before the first token starts from the first token; a cursor past
/// the last one yields nothing.
impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.position < 0 {
            self.reset();
        }
        let token = self.current_token().cloned()?;
        self.advance();
        Some(token)
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
