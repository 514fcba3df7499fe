//! Shared source-location helpers used by the token stream diagnostics.

pub mod span;

pub use span::{Position, SourceMap};
