//! Grammar definitions for CEPL

pub mod ast;
pub mod builders;
pub mod precedence;

// Re-export AST types
pub use ast::{render_tree, AstError, AstNode, NodeKind};

// Re-export builders
pub use builders::*;

pub use precedence::{
    Associativity, OperandSign, ARITHMETIC_LEVELS, FILTER_CONNECTIVES, RELATION_OPERATORS,
};
