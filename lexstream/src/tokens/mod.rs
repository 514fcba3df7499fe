//! Token system for lexstream
//!
//! This module holds the output side of lexical analysis: the [`Token`] value
//! type and the [`TokenStream`] cursor that consumers (typically hand-written
//! recursive-descent parsers) navigate.
//!
//! ## Key Components
//!
//! - **[`TokenType`]** - Grammar-defined integer tag, with a reserved
//!   [`TokenType::UNDEFINED`] sentinel for unclassified tokens
//! - **[`Token`]** - Matched text, type tag and byte offset
//! - **[`TokenStream`]** - Ordered tokens plus a primary cursor and a bounded
//!   peek cursor
//! - **[`Checkpoint`]** - Saved cursor position for backtracking
//!
//! ## Cursor Model
//!
//! The primary cursor either sits on a token or is exhausted (one before the
//! first token or one past the last). Navigation never fails: exhausted lookups
//! return `None` and predicates return `false`.
//!
//! The peek cursor is an offset relative to the primary cursor. `peek()` moves
//! it forward one step at a time up to the stream's `max_peek_steps`, and any
//! movement of the primary cursor clears it. `peek_beyond` scans from the peek
//! cursor for the closer that balances an opener/closer pair and is not bound
//! by the cap.

pub mod token;
pub mod token_stream;

// Re-export key types for convenience
pub use token::{Token, TokenType};
pub use token_stream::{Checkpoint, TokenStream};

// Re-export location types used by stream diagnostics
pub use crate::utils::{Position, SourceMap};
