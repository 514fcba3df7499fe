//! Concrete grammars shipped with lexstream

pub mod expression;

pub use expression::ExpressionGrammar;
