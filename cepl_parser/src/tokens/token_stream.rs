//! Token cursor over a lexed CEPL source
//!
//! Trivia stays in the stream so spans and dumps stay faithful to the
//! source; the parser only ever sees the significant view.

use crate::logging::{codes, Code};
use crate::tokens::token::Token;
use crate::utils::{Position, SourceMap, Span, Spanned};

pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TokenStreamError {
    #[error("Token stream must end with an end-of-input token, found {found}")]
    MissingEof { found: String },
}

impl TokenStreamError {
    pub fn error_code(&self) -> Code {
        match self {
            TokenStreamError::MissingEof { .. } => codes::syntax::MISSING_EOF,
        }
    }
}

/// Cursor over the significant tokens of a stream.
///
/// The last significant token is always [`Token::Eof`], so [`current`](Self::current)
/// never runs out. Advancing past it is a grammar bug and panics.
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// Every token including whitespace and comments
    all_tokens: Vec<SpannedToken>,
    /// Indices into `all_tokens` of significant tokens
    significant_indices: Vec<usize>,
    /// Position in `significant_indices`
    position: usize,
    source_map: Option<SourceMap>,
}

impl TokenStream {
    pub fn new(tokens: Vec<SpannedToken>) -> Result<Self, TokenStreamError> {
        let significant_indices: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.value.is_significant())
            .map(|(i, _)| i)
            .collect();

        match significant_indices.last().map(|&i| &tokens[i].value) {
            Some(Token::Eof) => {}
            Some(other) => {
                return Err(TokenStreamError::MissingEof {
                    found: other.to_string(),
                })
            }
            None => {
                return Err(TokenStreamError::MissingEof {
                    found: "an empty stream".to_string(),
                })
            }
        }

        // Only the final significant token may be EOF
        let eof_count = significant_indices
            .iter()
            .filter(|&&i| tokens[i].value.is_eof())
            .count();
        if eof_count > 1 {
            return Err(TokenStreamError::MissingEof {
                found: format!("{} end-of-input tokens", eof_count),
            });
        }

        crate::log_debug!("Token stream constructed",
            "total_tokens" => tokens.len(),
            "significant_tokens" => significant_indices.len()
        );

        Ok(Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
            source_map: None,
        })
    }

    pub fn with_source_map(
        tokens: Vec<SpannedToken>,
        source_map: SourceMap,
    ) -> Result<Self, TokenStreamError> {
        let mut stream = Self::new(tokens)?;
        stream.source_map = Some(source_map);
        Ok(stream)
    }

    // === CURSOR ===

    /// Lookahead token at the cursor
    pub fn current(&self) -> &SpannedToken {
        &self.all_tokens[self.significant_indices[self.position]]
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Move the cursor forward by one significant token
    ///
    /// # Panics
    /// When the cursor is already on the end-of-input token.
    pub fn advance(&mut self) {
        assert!(
            !self.is_at_end(),
            "advance() called at end of input (position {})",
            self.position
        );
        self.position += 1;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of significant tokens, EOF included
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    /// Always false: a valid stream holds at least the EOF token
    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    /// True when the cursor is on the end-of-input token
    pub fn is_at_end(&self) -> bool {
        self.current_token().is_eof()
    }

    // === INSPECTION ===

    pub fn iter_significant(&self) -> impl Iterator<Item = &SpannedToken> {
        self.significant_indices.iter().map(|&i| &self.all_tokens[i])
    }

    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }

    pub fn source_map(&self) -> Option<&SourceMap> {
        self.source_map.as_ref()
    }

    /// Source text of a span, when the source map is attached
    pub fn source_text(&self, span: &Span) -> Option<&str> {
        self.source_map.as_ref().map(|sm| sm.span_text(span))
    }

    pub fn diagnostic(&self) -> String {
        let current = self.current();
        format!(
            "TokenStream(pos: {}/{}, current: '{}' at {})",
            self.position,
            self.significant_indices.len(),
            current.value.describe(),
            current.span
        )
    }
}

/// Builds token streams with spans computed from each token's source text
#[derive(Debug)]
pub struct TokenStreamBuilder {
    tokens: Vec<SpannedToken>,
    position: Position,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            position: Position::start(),
        }
    }

    /// Append `token`, which covers `text` starting where the previous token ended
    pub fn push_token(&mut self, token: Token, text: &str) -> &mut Self {
        let start = self.position;
        let end = start.advance_str(text);
        self.tokens.push(Spanned::new(token, Span::new(start, end)));
        self.position = end;
        self
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn build(self) -> Result<TokenStream, TokenStreamError> {
        TokenStream::new(self.tokens)
    }
}

impl Default for TokenStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn word(name: &str) -> Token {
        Token::Word(name.to_string())
    }

    fn sample_stream() -> TokenStream {
        let mut builder = TokenStreamBuilder::new();
        builder
            .push_token(Token::Relation("R".to_string()), "R")
            .push_token(Token::Space, " ")
            .push_token(Token::As, "as")
            .push_token(Token::Newline, "\n")
            .push_token(word("x"), "x")
            .push_token(Token::Eof, "");
        builder.build().unwrap()
    }

    #[test]
    fn test_trivia_is_skipped() {
        let mut stream = sample_stream();
        assert_eq!(stream.len(), 4);
        assert_eq!(stream.all_tokens().len(), 6);

        assert_eq!(stream.current_token(), &Token::Relation("R".to_string()));
        stream.advance();
        assert_eq!(stream.current_token(), &Token::As);
        stream.advance();
        assert_eq!(stream.current_token(), &word("x"));
        assert_eq!(stream.current_span().start().line, 2);
        assert_eq!(stream.current_span().start().column, 1);
        stream.advance();
        assert!(stream.is_at_end());
        assert_eq!(stream.position(), 3);
    }

    #[test]
    #[should_panic(expected = "end of input")]
    fn test_advance_past_eof_panics() {
        let mut builder = TokenStreamBuilder::new();
        builder.push_token(Token::Eof, "");
        let mut stream = builder.build().unwrap();
        stream.advance();
    }

    #[test]
    fn test_missing_eof_is_rejected() {
        let mut builder = TokenStreamBuilder::new();
        builder.push_token(word("x"), "x").push_token(Token::Space, " ");
        let error = builder.build().unwrap_err();
        assert_matches!(error, TokenStreamError::MissingEof { .. });
        assert_eq!(error.error_code(), codes::syntax::MISSING_EOF);

        assert_matches!(
            TokenStream::new(Vec::new()),
            Err(TokenStreamError::MissingEof { .. })
        );
    }

    #[test]
    fn test_eof_must_be_last() {
        let mut builder = TokenStreamBuilder::new();
        builder
            .push_token(Token::Eof, "")
            .push_token(word("x"), "x")
            .push_token(Token::Eof, "");
        assert_matches!(builder.build(), Err(TokenStreamError::MissingEof { .. }));
    }

    #[test]
    fn test_diagnostic_names_current_token() {
        let stream = sample_stream();
        assert_eq!(stream.diagnostic(), "TokenStream(pos: 0/4, current: 'R' at 1:1)");
    }
}
