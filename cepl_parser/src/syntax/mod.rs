//! Syntax analysis: TokenStream to AST
//!
//! [`CeplParser`] owns the token cursor and hands itself to the grammar
//! builders. The module entry points add logging around a parse.

mod error;
mod parser;

pub use error::{SyntaxError, SyntaxResult};
pub use parser::CeplParser;

use crate::grammar::ast::AstNode;
use crate::lexical::{self, LexerError};
use crate::logging::{codes, Code};
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse a token stream into an AST with global logging
pub fn parse_cepl(source_name: &str, token_stream: TokenStream) -> SyntaxResult<AstNode> {
    log_debug!("Starting syntax analysis", "tokens" => token_stream.len());

    let result = CeplParser::new(source_name, token_stream).parse();

    match &result {
        Ok(ast) => {
            log_success!(
                codes::success::AST_CONSTRUCTION_COMPLETE,
                "Syntax analysis completed successfully",
                "nodes" => ast.node_count(),
                "depth" => ast.depth()
            );
        }
        Err(error) => {
            log_error!(error.error_code(), "Syntax analysis failed",
                span = error.span(),
                "error" => error
            );
        }
    }

    result
}

/// Failure of [`parse_source`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Lexical(#[from] LexerError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl SourceError {
    pub fn error_code(&self) -> Code {
        match self {
            SourceError::Lexical(e) => e.error_code(),
            SourceError::Syntax(e) => e.error_code(),
        }
    }
}

/// Tokenize and parse source text
pub fn parse_source(source_name: &str, source: &str) -> Result<AstNode, SourceError> {
    let tokens = lexical::tokenize(source_name, source)?;
    Ok(parse_cepl(source_name, tokens)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::NodeKind;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_source() {
        let ast = parse_source("q", "Buy as b : Sell as s filter s.price > 0").unwrap();
        assert_eq!(ast.kind, NodeKind::Seq);
        assert_eq!(ast.children[1].kind, NodeKind::Filter);
    }

    #[test]
    fn test_arithmetic_rejects_variables() {
        let error = parse_source("q", "Sell as s filter s.price > b.price").unwrap_err();
        assert_matches!(
            error,
            SourceError::Syntax(SyntaxError::UnexpectedToken { ref found, .. }) if found == "b"
        );
    }

    #[test]
    fn test_lexical_errors_surface() {
        let error = parse_source("q", "Buy as b = 3").unwrap_err();
        assert_matches!(error, SourceError::Lexical(LexerError::InvalidCharacter { character: '=', .. }));
        assert_eq!(error.error_code().as_str(), "E020");
    }

    #[test]
    fn test_syntax_errors_surface() {
        let error = parse_source("q", "Buy as").unwrap_err();
        assert_matches!(error, SourceError::Syntax(_));
        assert_eq!(error.error_code().as_str(), "E050");
    }
}
