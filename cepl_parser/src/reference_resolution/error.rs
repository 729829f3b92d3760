//! Error types for variable resolution

use crate::logging::{codes, Code};
use crate::utils::Span;
use thiserror::Error;

pub type ResolutionResult<T> = Result<T, ResolutionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    /// A property reference names a variable no relation binds
    #[error("Undefined variable '{name}' at {span}")]
    UndefinedVariable { name: String, span: Span },
}

impl ResolutionError {
    pub fn undefined_variable(name: &str, span: Span) -> Self {
        Self::UndefinedVariable {
            name: name.to_string(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UndefinedVariable { .. } => codes::references::UNDEFINED_VARIABLE,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. } => *span,
        }
    }
}
