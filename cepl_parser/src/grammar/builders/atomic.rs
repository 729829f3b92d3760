//! Cursor contract shared by all builders, plus single-token expectations
//!
//! Builders take `&mut dyn Parser` so they can be driven by any cursor over
//! significant tokens.

use crate::syntax::{SyntaxError, SyntaxResult};
use crate::tokens::{SpannedToken, Token};
use crate::utils::Span;
use std::mem::discriminant;

/// Parser trait that builders expect
pub trait Parser {
    // === BASIC NAVIGATION ===

    /// Token at the cursor; EOF once the input is exhausted
    fn current(&self) -> &SpannedToken;

    /// Consume the current token. Never called at EOF.
    fn advance(&mut self);

    fn current_token(&self) -> &Token {
        &self.current().value
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    // === SPAN REPORTING ===

    /// Span of the most recently consumed token
    fn last_span(&self) -> Span;

    fn source_name(&self) -> &str;

    // === NESTING ===

    /// Open one nested production, failing at the current token once the
    /// nesting limit is reached
    fn enter(&mut self) -> SyntaxResult<()>;

    /// Close a production opened by [`enter`](Parser::enter)
    fn leave(&mut self);

    /// Error at the current token
    fn unexpected(&self, expected: &str) -> SyntaxError {
        let current = self.current();
        SyntaxError::unexpected_token(self.source_name(), expected, &current.value, current.span)
    }
}

/// Run `production` one nesting level deeper
pub fn nested<T>(
    parser: &mut dyn Parser,
    production: impl FnOnce(&mut dyn Parser) -> SyntaxResult<T>,
) -> SyntaxResult<T> {
    parser.enter()?;
    let result = production(&mut *parser);
    parser.leave();
    result
}

/// Consume a token of the same kind as `expected`
pub fn expect_token(
    parser: &mut dyn Parser,
    expected: &Token,
    description: &str,
) -> SyntaxResult<SpannedToken> {
    if discriminant(parser.current_token()) != discriminant(expected) {
        return Err(parser.unexpected(description));
    }
    let token = parser.current().clone();
    parser.advance();
    Ok(token)
}

/// Consume a lowercase-initial word (variable or property name)
pub fn expect_word(parser: &mut dyn Parser, description: &str) -> SyntaxResult<SpannedToken> {
    expect_token(parser, &Token::Word(String::new()), description)
}

/// Consume a comparison operator (PRED_OP)
pub fn expect_comparison(parser: &mut dyn Parser) -> SyntaxResult<SpannedToken> {
    match parser.current_token() {
        Token::Comparison(_) => {
            let token = parser.current().clone();
            parser.advance();
            Ok(token)
        }
        _ => Err(parser.unexpected("comparison operator")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::CeplParser;
    use assert_matches::assert_matches;

    fn parser(source: &str) -> CeplParser {
        CeplParser::new("test.cepl", tokenize("test.cepl", source).unwrap())
    }

    #[test]
    fn test_expect_token_consumes_matching_kind() {
        let mut p = parser("x . p");
        let word = expect_word(&mut p, "variable name").unwrap();
        assert_eq!(word.value, Token::Word("x".to_string()));
        expect_token(&mut p, &Token::Dot, "'.'").unwrap();
        assert_eq!(p.last_span().start.column, 3);
        assert_eq!(p.current_token(), &Token::Word("p".to_string()));
    }

    #[test]
    fn test_expect_token_reports_current_token() {
        let mut p = parser("Stock");
        let error = expect_word(&mut p, "variable name").unwrap_err();
        assert_matches!(
            &error,
            SyntaxError::UnexpectedToken { found, expected, .. }
                if found == "Stock" && expected == "variable name"
        );
        // Cursor stays put on failure
        assert_eq!(p.current_token(), &Token::Relation("Stock".to_string()));
    }

    #[test]
    fn test_expect_comparison() {
        let mut p = parser("<= 3");
        let op = expect_comparison(&mut p).unwrap();
        assert_eq!(op.value.as_cepl_string(), "<=");
        assert!(expect_comparison(&mut p).is_err());
    }
}
