//! Error and success codes with their behavioral metadata
//!
//! Every code the crate emits is declared here once, next to the table row
//! that classifies it.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code wrapper shared by error, warning and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Classification of a single code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    const fn new(
        code: Code,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code: code.0,
            category,
            severity,
            recoverable,
            requires_halt: !recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod configuration {
    use super::Code;

    pub const INVALID_CONFIG: Code = Code::new("E001");
    pub const CONFIG_READ_ERROR: Code = Code::new("E002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const INVALID_NUMBER: Code = Code::new("E022");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const NESTING_TOO_DEEP: Code = Code::new("E028");
}

pub mod syntax {
    use super::Code;

    pub const MISSING_EOF: Code = Code::new("E040");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
}

pub mod references {
    use super::Code;

    pub const UNDEFINED_VARIABLE: Code = Code::new("E110");
    pub const VARIABLE_REBOUND: Code = Code::new("W110");
}

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const AST_CONSTRUCTION_COMPLETE: Code = Code::new("I040");
    pub const REFERENCE_RESOLUTION_COMPLETE: Code = Code::new("I060");
}

/// Codes used by events that were not given a specific one
pub mod generic {
    use super::Code;

    pub const WARNING: Code = Code::new("W000");
    pub const INFO: Code = Code::new("I000");
    pub const DEBUG: Code = Code::new("D000");
}

// ============================================================================
// METADATA TABLE
// ============================================================================

use Severity::{Critical, High, Low, Medium};

static METADATA: &[ErrorMetadata] = &[
    ErrorMetadata::new(
        system::INTERNAL_ERROR,
        "System",
        Critical,
        false,
        "Critical internal error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        system::INITIALIZATION_FAILURE,
        "System",
        Critical,
        false,
        "Logging or configuration could not be initialized",
        "Check the runtime configuration and environment",
    ),
    ErrorMetadata::new(
        configuration::INVALID_CONFIG,
        "Configuration",
        High,
        false,
        "Configuration file is not valid TOML or has unknown values",
        "Fix the reported key in the configuration file",
    ),
    ErrorMetadata::new(
        configuration::CONFIG_READ_ERROR,
        "Configuration",
        High,
        false,
        "Configuration file could not be read",
        "Check that the configuration path exists and is readable",
    ),
    ErrorMetadata::new(
        file_processing::FILE_NOT_FOUND,
        "FileProcessing",
        High,
        false,
        "Query file does not exist",
        "Check the file path",
    ),
    ErrorMetadata::new(
        file_processing::INVALID_EXTENSION,
        "FileProcessing",
        Medium,
        false,
        "Query file does not use the .cepl extension",
        "Rename the file or disable the extension requirement",
    ),
    ErrorMetadata::new(
        file_processing::FILE_TOO_LARGE,
        "FileProcessing",
        High,
        false,
        "Query file exceeds the maximum size",
        "Split the query or reduce its size",
    ),
    ErrorMetadata::new(
        file_processing::EMPTY_FILE,
        "FileProcessing",
        Medium,
        false,
        "Query file is empty",
        "Write a query into the file",
    ),
    ErrorMetadata::new(
        file_processing::PERMISSION_DENIED,
        "FileProcessing",
        High,
        false,
        "Query file is not readable",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        file_processing::INVALID_ENCODING,
        "FileProcessing",
        High,
        false,
        "Query file is not valid UTF-8",
        "Re-save the file as UTF-8",
    ),
    ErrorMetadata::new(
        file_processing::IO_ERROR,
        "FileProcessing",
        High,
        false,
        "I/O failure while reading the query file",
        "Retry or check the underlying storage",
    ),
    ErrorMetadata::new(
        file_processing::INVALID_PATH,
        "FileProcessing",
        High,
        false,
        "Path is empty or does not name a regular file",
        "Pass the path of a query file",
    ),
    ErrorMetadata::new(
        file_processing::TOO_MANY_LINES,
        "FileProcessing",
        High,
        false,
        "Query file has more lines than allowed",
        "Reduce the number of lines in the query",
    ),
    ErrorMetadata::new(
        lexical::INVALID_CHARACTER,
        "Lexical",
        High,
        false,
        "Character that cannot start any token",
        "Remove or replace the character",
    ),
    ErrorMetadata::new(
        lexical::INVALID_NUMBER,
        "Lexical",
        High,
        false,
        "Malformed or oversized numeric literal",
        "Write the number as digits with an optional fraction and exponent",
    ),
    ErrorMetadata::new(
        lexical::IDENTIFIER_TOO_LONG,
        "Lexical",
        Medium,
        false,
        "Identifier longer than the allowed maximum",
        "Shorten the relation, variable or property name",
    ),
    ErrorMetadata::new(
        lexical::COMMENT_TOO_LONG,
        "Lexical",
        Low,
        false,
        "Comment longer than the allowed maximum",
        "Shorten the comment",
    ),
    ErrorMetadata::new(
        lexical::TOO_MANY_TOKENS,
        "Lexical",
        High,
        false,
        "Query produces more tokens than allowed",
        "Split the query into smaller ones",
    ),
    ErrorMetadata::new(
        lexical::NESTING_TOO_DEEP,
        "Lexical",
        High,
        false,
        "Parentheses nested deeper than allowed",
        "Remove redundant parentheses",
    ),
    ErrorMetadata::new(
        syntax::MISSING_EOF,
        "Syntax",
        Critical,
        false,
        "Token stream does not end with an end-of-input token",
        "File a bug report; the lexer always appends one",
    ),
    ErrorMetadata::new(
        syntax::UNEXPECTED_TOKEN,
        "Syntax",
        High,
        false,
        "Token does not fit the query grammar at this position",
        "Check the query near the reported position",
    ),
    ErrorMetadata::new(
        references::UNDEFINED_VARIABLE,
        "References",
        High,
        false,
        "Filter refers to a variable that no relation binds",
        "Bind the variable with `Relation as name` or fix the spelling",
    ),
    ErrorMetadata::new(
        references::VARIABLE_REBOUND,
        "References",
        Low,
        true,
        "Variable name bound to more than one relation",
        "Use distinct variable names if the relations are unrelated",
    ),
];

static REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|m| m.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|m| m.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|m| m.recommended_action)
        .unwrap_or("No specific action available")
}

/// Category of a code; success and generic codes are classified by prefix
pub fn get_category(code: &str) -> &'static str {
    if let Some(metadata) = get_error_metadata(code) {
        return metadata.category;
    }
    match code.chars().next() {
        Some('I') => "Success",
        Some('W') => "Warning",
        Some('D') => "Debug",
        _ => "Unknown",
    }
}
