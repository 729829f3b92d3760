pub mod nodes;
pub mod printer;

pub use nodes::{AstError, AstNode, NodeKind};
pub use printer::render_tree;
