//! Syntax errors
//!
//! The grammar has a single failure mode: the lookahead token is not one the
//! current production accepts. Errors are fatal to the parse; there is no
//! resynchronization.

use crate::logging::codes::{self, Code, Severity};
use crate::tokens::Token;
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error(
        "{source_name}:{}:{}: unexpected token '{found}', expected {expected}",
        .span.start.line,
        .span.start.column
    )]
    UnexpectedToken {
        source_name: String,
        expected: String,
        found: String,
        span: Span,
    },
}

impl SyntaxError {
    pub fn unexpected_token(source_name: &str, expected: &str, found: &Token, span: Span) -> Self {
        SyntaxError::UnexpectedToken {
            source_name: source_name.to_string(),
            expected: expected.to_string(),
            found: found.describe(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            SyntaxError::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxError::UnexpectedToken { span, .. } => *span,
        }
    }

    pub fn expected(&self) -> &str {
        match self {
            SyntaxError::UnexpectedToken { expected, .. } => expected,
        }
    }

    pub fn found(&self) -> &str {
        match self {
            SyntaxError::UnexpectedToken { found, .. } => found,
        }
    }

    pub fn severity(&self) -> Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_message_names_file_and_position() {
        let span = Span::new(Position::new(9, 2, 4), Position::new(10, 2, 5));
        let error = SyntaxError::unexpected_token("query.cepl", "'as'", &Token::RightParen, span);
        assert_eq!(
            error.to_string(),
            "query.cepl:2:4: unexpected token ')', expected 'as'"
        );
        assert_eq!(error.span(), span);
        assert_eq!(error.found(), ")");
    }

    #[test]
    fn test_eof_is_described() {
        let error = SyntaxError::unexpected_token("q", "variable name", &Token::Eof, Span::dummy());
        assert_eq!(error.to_string(), "q:1:1: unexpected token '<EOF>', expected variable name");
    }

    #[test]
    fn test_registry_lookups() {
        let error = SyntaxError::unexpected_token("q", "')'", &Token::Eof, Span::dummy());
        assert_eq!(error.error_code().as_str(), "E050");
        assert!(!error.is_recoverable());
        assert_eq!(error.severity(), Severity::High);
    }
}
