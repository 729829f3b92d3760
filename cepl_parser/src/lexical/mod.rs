//! Lexical analysis: CEPL source text to a [`TokenStream`]

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};

use crate::config::runtime::LexicalPreferences;
use crate::file_processor::FileProcessingResult;
use crate::tokens::TokenStream;

/// Tokenize with default preferences
pub fn tokenize(source_name: &str, source: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(source_name, source)
}

/// Tokenize a loaded file; returns the stream and the metrics gathered on the way
pub fn tokenize_file_result(
    file_result: &FileProcessingResult,
    preferences: LexicalPreferences,
) -> Result<(TokenStream, LexicalMetrics), LexerError> {
    let mut analyzer = LexicalAnalyzer::with_preferences(preferences);
    let source_name = file_result.metadata.path.display().to_string();
    let stream = analyzer.tokenize(&source_name, &file_result.source)?;
    Ok((stream, analyzer.metrics().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_attaches_source_map() {
        let stream = tokenize("query.cepl", "R as r").unwrap();
        let source_map = stream.source_map().unwrap();
        assert_eq!(source_map.name(), "query.cepl");
        assert_eq!(stream.source_text(&stream.current_span()), Some("R"));
    }
}
