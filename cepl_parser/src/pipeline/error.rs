use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;
use crate::reference_resolution::ResolutionError;
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Pipeline processing errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    #[error("Variable resolution failed: {0}")]
    VariableResolution(#[from] ResolutionError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::LexicalAnalysis(e) => e.error_code(),
            Self::SyntaxAnalysis(e) => e.error_code(),
            Self::VariableResolution(e) => e.error_code(),
        }
    }

    /// Source location of the failure, when the stage has one
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::FileProcessing(_) => None,
            Self::LexicalAnalysis(e) => Some(e.span()),
            Self::SyntaxAnalysis(e) => Some(e.span()),
            Self::VariableResolution(e) => Some(e.span()),
        }
    }

    /// Stage name for reporting
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileProcessing(_) => "file processing",
            Self::LexicalAnalysis(_) => "lexical analysis",
            Self::SyntaxAnalysis(_) => "syntax analysis",
            Self::VariableResolution(_) => "variable resolution",
        }
    }
}
