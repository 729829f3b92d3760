//! CEPL tokenizer

use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::{codes, Code};
use crate::tokens::{classify_word, ComparisonOp, Token, TokenClass, TokenStream, TokenStreamError};
use crate::utils::{Position, SourceMap, Span, Spanned};
use crate::{log_debug, log_error, log_success};
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::str::CharIndices;

/// Lexical analysis errors, each positioned at the offending input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid character '{character}' at {position}")]
    InvalidCharacter { character: char, position: Position },

    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("Identifier too long at {position}: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, position: Position },

    #[error("Comment too long at {position}: {length} characters (max {MAX_COMMENT_LENGTH})")]
    CommentTooLong { length: usize, position: Position },

    #[error("Too many tokens at {position}: more than {MAX_TOKEN_COUNT}")]
    TooManyTokens { position: Position },

    #[error("Parentheses nested too deep at {position}: {depth} (max {MAX_NESTING_DEPTH})")]
    NestingTooDeep { depth: usize, position: Position },

    #[error(transparent)]
    Stream(#[from] TokenStreamError),
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            LexerError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            LexerError::InvalidNumber { .. } => codes::lexical::INVALID_NUMBER,
            LexerError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexerError::CommentTooLong { .. } => codes::lexical::COMMENT_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            LexerError::NestingTooDeep { .. } => codes::lexical::NESTING_TOO_DEEP,
            LexerError::Stream(e) => e.error_code(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            LexerError::InvalidCharacter { position, .. }
            | LexerError::InvalidNumber { position, .. }
            | LexerError::IdentifierTooLong { position, .. }
            | LexerError::CommentTooLong { position, .. }
            | LexerError::TooManyTokens { position }
            | LexerError::NestingTooDeep { position, .. } => *position,
            LexerError::Stream(_) => Position::start(),
        }
    }

    pub fn span(&self) -> Span {
        Span::point(self.position())
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct LexicalMetrics {
    /// Significant tokens, plus trivia when `include_trivia_in_counts` is set
    pub total_tokens: usize,
    pub tokens_by_class: BTreeMap<TokenClass, usize>,
    pub comment_count: usize,
    pub max_comment_length: usize,
    pub max_nesting_depth: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        if token.is_trivia() && !preferences.include_trivia_in_counts {
            if let Token::Comment(_) = token {
                self.comment_count += 1;
            }
            return;
        }

        self.total_tokens += 1;
        if let Token::Comment(_) = token {
            self.comment_count += 1;
        }
        if preferences.collect_detailed_metrics {
            *self.tokens_by_class.entry(token.token_class()).or_insert(0) += 1;
        }
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Tokenize `source`, attaching a source map named `source_name` for diagnostics
    pub fn tokenize(&mut self, source_name: &str, source: &str) -> Result<TokenStream, LexerError> {
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "source" => source_name,
            "bytes" => source.len()
        );

        let tokens = match self.scan(source) {
            Ok(tokens) => tokens,
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = error.span(),
                    "source" => source_name
                );
                return Err(error);
            }
        };

        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "source" => source_name,
            "tokens" => self.metrics.total_tokens,
            "comments" => self.metrics.comment_count,
            "max_nesting" => self.metrics.max_nesting_depth
        );

        let source_map = SourceMap::new(source_name, source);
        Ok(TokenStream::with_source_map(tokens, source_map)?)
    }

    fn scan(&mut self, source: &str) -> Result<Vec<Spanned<Token>>, LexerError> {
        let mut tokens = Vec::new();
        let mut chars = source.char_indices().peekable();
        let mut position = Position::start();
        let mut significant_count = 0usize;
        let mut depth = 0usize;

        while let Some(&(offset, ch)) = chars.peek() {
            let start = position;
            let token = match ch {
                ' ' => {
                    chars.next();
                    Token::Space
                }
                '\t' => {
                    chars.next();
                    Token::Tab
                }
                '\n' => {
                    chars.next();
                    Token::Newline
                }
                '\r' => {
                    chars.next();
                    if let Some(&(_, '\n')) = chars.peek() {
                        chars.next();
                    }
                    Token::Newline
                }
                '#' => self.scan_comment(&mut chars, start)?,
                '(' => {
                    chars.next();
                    depth += 1;
                    if depth > MAX_NESTING_DEPTH {
                        return Err(LexerError::NestingTooDeep {
                            depth,
                            position: start,
                        });
                    }
                    self.metrics.max_nesting_depth = self.metrics.max_nesting_depth.max(depth);
                    Token::LeftParen
                }
                ')' => {
                    chars.next();
                    depth = depth.saturating_sub(1);
                    Token::RightParen
                }
                '+' => single(&mut chars, Token::Plus),
                '-' => single(&mut chars, Token::Minus),
                '*' => single(&mut chars, Token::Multiply),
                '/' => single(&mut chars, Token::Divide),
                ':' => single(&mut chars, Token::Colon),
                '|' => single(&mut chars, Token::Pipe),
                '.' => single(&mut chars, Token::Dot),
                '<' | '>' | '=' | '!' => scan_comparison(&mut chars, start)?,
                '0'..='9' => scan_number(source, offset, &mut chars, start)?,
                c if c.is_ascii_alphabetic() || c == '_' => {
                    scan_word(source, offset, &mut chars, start)?
                }
                other => {
                    return Err(LexerError::InvalidCharacter {
                        character: other,
                        position: start,
                    })
                }
            };

            let end_offset = chars.peek().map(|&(o, _)| o).unwrap_or(source.len());
            position = start.advance_str(&source[offset..end_offset]);

            if token.is_significant() {
                significant_count += 1;
                if significant_count > MAX_TOKEN_COUNT {
                    return Err(LexerError::TooManyTokens { position: start });
                }
            }

            self.metrics.record_token(&token, &self.preferences);
            tokens.push(Spanned::new(token, Span::new(start, position)));
        }

        self.metrics.record_token(&Token::Eof, &self.preferences);
        tokens.push(Spanned::new(Token::Eof, Span::point(position)));
        Ok(tokens)
    }

    fn scan_comment(&mut self, chars: &mut Chars<'_>, start: Position) -> Result<Token, LexerError> {
        chars.next(); // '#'
        let mut content = String::new();

        while let Some(&(_, ch)) = chars.peek() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            content.push(ch);
            chars.next();

            if content.len() > MAX_COMMENT_LENGTH {
                return Err(LexerError::CommentTooLong {
                    length: content.len(),
                    position: start,
                });
            }
        }

        self.metrics.max_comment_length = self.metrics.max_comment_length.max(content.len());
        Ok(Token::Comment(content))
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn single(chars: &mut Chars<'_>, token: Token) -> Token {
    chars.next();
    token
}

fn scan_comparison(chars: &mut Chars<'_>, start: Position) -> Result<Token, LexerError> {
    let Some((_, first)) = chars.next() else {
        return Err(LexerError::InvalidCharacter {
            character: '\0',
            position: start,
        });
    };
    let followed_by_equals = matches!(chars.peek(), Some(&(_, '=')));

    let op = match (first, followed_by_equals) {
        ('<', true) => ComparisonOp::LessThanOrEqual,
        ('>', true) => ComparisonOp::GreaterThanOrEqual,
        ('=', true) => ComparisonOp::Equals,
        ('!', true) => ComparisonOp::NotEquals,
        ('<', false) => ComparisonOp::LessThan,
        ('>', false) => ComparisonOp::GreaterThan,
        // A lone '=' or '!' is not an operator
        (other, _) => {
            return Err(LexerError::InvalidCharacter {
                character: other,
                position: start,
            })
        }
    };
    if followed_by_equals {
        chars.next();
    }

    Ok(Token::Comparison(op))
}

fn consume_digits(chars: &mut Chars<'_>) -> usize {
    let mut count = 0;
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        chars.next();
        count += 1;
    }
    count
}

/// `digits ('.' digits)? ([eE] [+-]? digits)?`
fn scan_number(
    source: &str,
    offset: usize,
    chars: &mut Chars<'_>,
    start: Position,
) -> Result<Token, LexerError> {
    consume_digits(chars);

    // Fraction only when a digit follows the dot, so `1.x` stays three tokens
    let mut lookahead = chars.clone();
    if let (Some((_, '.')), Some((_, d))) = (lookahead.next(), lookahead.next()) {
        if d.is_ascii_digit() {
            chars.next();
            consume_digits(chars);
        }
    }

    let mut lookahead = chars.clone();
    if let Some((_, 'e' | 'E')) = lookahead.next() {
        if let Some(&(_, '+' | '-')) = lookahead.peek() {
            lookahead.next();
        }
        if matches!(lookahead.peek(), Some(&(_, d)) if d.is_ascii_digit()) {
            *chars = lookahead;
            consume_digits(chars);
        }
    }

    let end = chars.peek().map(|&(o, _)| o).unwrap_or(source.len());
    let text = &source[offset..end];

    let valid = text.len() <= MAX_NUMBER_LENGTH
        && text.parse::<f64>().map(f64::is_finite).unwrap_or(false);
    if !valid {
        return Err(LexerError::InvalidNumber {
            text: text.to_string(),
            position: start,
        });
    }

    Ok(Token::Number(text.to_string()))
}

fn scan_word(
    source: &str,
    offset: usize,
    chars: &mut Chars<'_>,
    start: Position,
) -> Result<Token, LexerError> {
    while let Some(&(_, c)) = chars.peek() {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            break;
        }
        chars.next();
    }

    let end = chars.peek().map(|&(o, _)| o).unwrap_or(source.len());
    let word = &source[offset..end];
    if word.len() > MAX_IDENTIFIER_LENGTH {
        return Err(LexerError::IdentifierTooLong {
            length: word.len(),
            position: start,
        });
    }

    Ok(classify_word(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn significant(source: &str) -> Vec<Token> {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize("test", source).unwrap();
        stream.iter_significant().map(|t| t.value.clone()).collect()
    }

    fn word(name: &str) -> Token {
        Token::Word(name.to_string())
    }

    #[test]
    fn test_relation_binding() {
        assert_eq!(
            significant("Stock AS s"),
            vec![Token::Relation("Stock".to_string()), Token::As, word("s"), Token::Eof]
        );
    }

    #[test]
    fn test_filter_query_tokens() {
        let tokens = significant("(A as a)+ filter not a.p >= 2.5e1 Or a.q != 3 : B as b | C as c");
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::Relation("A".to_string()),
                Token::As,
                word("a"),
                Token::RightParen,
                Token::Plus,
                Token::Filter,
                Token::Not,
                word("a"),
                Token::Dot,
                word("p"),
                Token::Comparison(ComparisonOp::GreaterThanOrEqual),
                Token::Number("2.5e1".to_string()),
                Token::FilterOp("or".to_string()),
                word("a"),
                Token::Dot,
                word("q"),
                Token::Comparison(ComparisonOp::NotEquals),
                Token::Number("3".to_string()),
                Token::Colon,
                Token::Relation("B".to_string()),
                Token::As,
                word("b"),
                Token::Pipe,
                Token::Relation("C".to_string()),
                Token::As,
                word("c"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_arithmetic_symbols() {
        assert_eq!(
            significant("-(1+2)*3/4"),
            vec![
                Token::Minus,
                Token::LeftParen,
                Token::Number("1".to_string()),
                Token::Plus,
                Token::Number("2".to_string()),
                Token::RightParen,
                Token::Multiply,
                Token::Number("3".to_string()),
                Token::Divide,
                Token::Number("4".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_dot_without_fraction_digits() {
        assert_eq!(
            significant("1.x"),
            vec![Token::Number("1".to_string()), Token::Dot, word("x"), Token::Eof]
        );
    }

    #[test]
    fn test_comments_and_positions() {
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer
            .tokenize("test", "# leading comment\n  R as r")
            .unwrap();

        assert_matches!(stream.all_tokens()[0].value, Token::Comment(ref text) if text == " leading comment");
        let relation = stream.current();
        assert_eq!(relation.span.start().line, 2);
        assert_eq!(relation.span.start().column, 3);
        assert_eq!(analyzer.metrics().comment_count, 1);

        let eof = stream.iter_significant().last().unwrap();
        assert!(eof.value.is_eof());
        assert_eq!(eof.span.start().column, 9);
        assert!(eof.span.is_empty());
    }

    #[test]
    fn test_metrics_count_significant_tokens() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("test", "((R as r))").unwrap();

        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 8);
        assert_eq!(metrics.max_nesting_depth, 2);
    }

    #[test]
    fn test_invalid_characters() {
        let mut analyzer = LexicalAnalyzer::new();
        let error = analyzer.tokenize("test", "R as r filter r.p = 1").unwrap_err();
        assert_matches!(error, LexerError::InvalidCharacter { character: '=', .. });
        assert_eq!(error.position().column, 19);
        assert_eq!(error.error_code(), codes::lexical::INVALID_CHARACTER);

        assert_matches!(
            analyzer.tokenize("test", "R as r @"),
            Err(LexerError::InvalidCharacter { character: '@', .. })
        );
        assert_matches!(
            analyzer.tokenize("test", "R as é"),
            Err(LexerError::InvalidCharacter { character: 'é', .. })
        );
    }

    #[test]
    fn test_limits() {
        let mut analyzer = LexicalAnalyzer::new();

        let long_word = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_matches!(
            analyzer.tokenize("test", &long_word),
            Err(LexerError::IdentifierTooLong { .. })
        );

        let deep = "(".repeat(MAX_NESTING_DEPTH + 1);
        assert_matches!(
            analyzer.tokenize("test", &deep),
            Err(LexerError::NestingTooDeep { .. })
        );

        let huge = format!("1e{}", 400);
        assert_matches!(
            analyzer.tokenize("test", &huge),
            Err(LexerError::InvalidNumber { .. })
        );

        let comment = format!("#{}", "c".repeat(MAX_COMMENT_LENGTH + 1));
        assert_matches!(
            analyzer.tokenize("test", &comment),
            Err(LexerError::CommentTooLong { .. })
        );

        let many = ":".repeat(MAX_TOKEN_COUNT + 1);
        assert_matches!(
            analyzer.tokenize("test", &many),
            Err(LexerError::TooManyTokens { .. })
        );
    }

    #[test]
    fn test_empty_source_is_just_eof() {
        assert_eq!(significant(""), vec![Token::Eof]);
        assert_eq!(significant(" \t\r\n"), vec![Token::Eof]);
    }
}
