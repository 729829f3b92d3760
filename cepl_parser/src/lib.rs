// Internal modules
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod reference_resolution;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::{render_tree, AstNode, NodeKind};
pub use pipeline::{process_file, process_source, PipelineError, PipelineResult};
pub use reference_resolution::{resolve_variables, VariableTable};
pub use syntax::{parse_cepl, parse_source, CeplParser, SyntaxError};
