//! Configuration for the CEPL parser
//!
//! Security boundaries are compile-time constants in [`constants`]; user
//! facing behaviour lives in [`runtime`] and can be overridden through
//! `CEPL_*` environment variables or a TOML file.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConfigError, RuntimeConfig};
