//! Shared primitives for the CEPL lexer, parser and diagnostics

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
