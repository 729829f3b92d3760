use crate::file_processor::FileMetadata;
use crate::grammar::ast::AstNode;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use crate::reference_resolution::VariableTable;
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything the pipeline learned about one query
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub ast: AstNode,
    pub variables: VariableTable,
    /// Absent when the source did not come from a file
    pub file_metadata: Option<FileMetadata>,
    pub lexical_metrics: LexicalMetrics,
    pub tokens: TokenStream,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn log_success(&self, source_name: &str) {
        let seconds = self.processing_duration.as_secs_f64().max(f64::EPSILON);
        crate::log_success!(
            codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "CEPL processing pipeline succeeded",
            "source" => source_name,
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "nodes" => self.ast.node_count(),
            "variables" => self.variables.len(),
            "processing_rate_tokens_per_sec" => format!("{:.0}", self.token_count as f64 / seconds)
        );
    }
}
