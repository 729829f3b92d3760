//! Builder functions for CEPL grammar productions

pub mod arithmetic;
pub mod atomic;
pub mod filters;
pub mod relations;

pub use arithmetic::{evaluate_arithmetic, parse_arithmetic_value};
pub use atomic::{expect_comparison, expect_token, expect_word, Parser};
pub use filters::{parse_filter_formula, parse_var_prop};
pub use relations::{parse_cepl, parse_expression_term, parse_relation_operand};
