//! CEPL tokens and the token cursor consumed by the parser

pub mod token;
pub mod token_stream;

pub use token::{classify_word, ComparisonOp, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream, TokenStreamBuilder, TokenStreamError};
