// RUNTIME PREFERENCES (User Experience)

use crate::logging::{codes, Code, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    Parse { message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Read { .. } => codes::configuration::CONFIG_READ_ERROR,
            ConfigError::Parse { .. } => codes::configuration::INVALID_CONFIG,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Reject files that do not end in `.cepl`
    pub require_cepl_extension: bool,

    /// Attach size and timing metrics to the file processing success event
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_cepl_extension: env_flag(env_vars::REQUIRE_CEPL_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to count tokens per class
    pub collect_detailed_metrics: bool,

    /// Whether whitespace and comments count towards the token total
    pub include_trivia_in_counts: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            include_trivia_in_counts: env_flag(env_vars::LEXICAL_INCLUDE_TRIVIA, false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Write log events to stderr at all
    pub enable_console_logging: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Add the current file path to every event
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

/// How the `cepl` binary renders a parsed query
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree, one node per line
    #[default]
    Tree,
    /// Single-line `KIND(child, ...)` form
    Sexpr,
    /// Serialized AST
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "tree" => Some(Self::Tree),
            "sexpr" => Some(Self::Sexpr),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPreferences {
    pub format: OutputFormat,

    /// Print the significant token stream before the tree
    pub show_tokens: bool,

    /// Print the resolved variable table after the tree
    pub show_variables: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            format: env::var(env_vars::OUTPUT_FORMAT)
                .ok()
                .and_then(|v| OutputFormat::parse(&v))
                .unwrap_or_default(),
            show_tokens: env_flag(env_vars::OUTPUT_SHOW_TOKENS, false),
            show_variables: env_flag(env_vars::OUTPUT_SHOW_VARIABLES, true),
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
    pub output: OutputPreferences,
}

impl RuntimeConfig {
    /// Parse a TOML document; missing tables and keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_CEPL_EXTENSION: &str = "CEPL_REQUIRE_CEPL_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "CEPL_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "CEPL_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_INCLUDE_TRIVIA: &str = "CEPL_LEXICAL_INCLUDE_TRIVIA";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CEPL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CEPL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CEPL_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "CEPL_LOGGING_INCLUDE_FILE_CONTEXT";

    // Output
    pub const OUTPUT_FORMAT: &str = "CEPL_OUTPUT_FORMAT";
    pub const OUTPUT_SHOW_TOKENS: &str = "CEPL_OUTPUT_SHOW_TOKENS";
    pub const OUTPUT_SHOW_VARIABLES: &str = "CEPL_OUTPUT_SHOW_VARIABLES";
}
