//! End-to-end processing: file, tokens, AST, variables

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::config::RuntimeConfig;
use crate::file_processor::{FileMetadata, FileProcessor};
use crate::lexical::{LexicalAnalyzer, LexicalMetrics};
use crate::logging;
use crate::tokens::TokenStream;
use std::path::Path;
use std::time::Instant;

/// Process a file with default preferences
pub fn process_file(path: &Path) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(path, &RuntimeConfig::default())
}

/// Process a file through every stage (file -> lexical -> syntax -> variables)
pub fn process_file_with_config(
    path: &Path,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(path.to_path_buf(), 0, || {
        crate::log_info!("Starting CEPL file processing pipeline", "file" => path.display());

        let file_result = FileProcessor::from_preferences(&config.file_processor).process_file(path)?;
        let source_name = path.display().to_string();

        let (tokens, lexical_metrics) =
            crate::lexical::tokenize_file_result(&file_result, config.lexical.clone())?;

        let result = finish(
            &source_name,
            tokens,
            lexical_metrics,
            Some(file_result.metadata),
            start_time,
        )?;
        result.log_success(&source_name);
        Ok(result)
    })
}

/// Process in-memory source text; `source_name` only labels diagnostics
pub fn process_source(source_name: &str, source: &str) -> Result<PipelineResult, PipelineError> {
    process_source_with_config(source_name, source, &RuntimeConfig::default())
}

pub fn process_source_with_config(
    source_name: &str,
    source: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexical.clone());
    let tokens = analyzer.tokenize(source_name, source)?;
    let lexical_metrics = analyzer.metrics().clone();

    let result = finish(source_name, tokens, lexical_metrics, None, start_time)?;
    result.log_success(source_name);
    Ok(result)
}

fn finish(
    source_name: &str,
    tokens: TokenStream,
    lexical_metrics: LexicalMetrics,
    file_metadata: Option<FileMetadata>,
    start_time: Instant,
) -> Result<PipelineResult, PipelineError> {
    let token_count = tokens.len();
    let ast = crate::syntax::parse_cepl(source_name, tokens.clone())?;
    let variables = crate::reference_resolution::resolve_variables(&ast)?;

    Ok(PipelineResult {
        ast,
        variables,
        file_metadata,
        lexical_metrics,
        tokens,
        token_count,
        processing_duration: start_time.elapsed(),
    })
}
