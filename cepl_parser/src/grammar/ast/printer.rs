//! Textual renderings of an AST
//!
//! `Display` produces the compact S-expression form, `KIND(child, ...)` for
//! branches and `KIND(text)` for leaves. [`render_tree`] produces one node
//! per line, indented by depth.

use super::nodes::AstNode;
use std::fmt;

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.name())?;
        if self.kind.is_leaf() {
            f.write_str(&self.text().unwrap_or_default())?;
        } else {
            for (index, child) in self.children.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", child)?;
            }
        }
        f.write_str(")")
    }
}

/// Indented tree, two spaces per level; leaves print as `KIND text`
pub fn render_tree(node: &AstNode) -> String {
    let mut out = String::new();
    write_node(node, 0, &mut out);
    out
}

fn write_node(node: &AstNode, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(node.kind.name());
    if node.kind.is_leaf() {
        out.push(' ');
        out.push_str(&node.text().unwrap_or_default());
    }
    out.push('\n');

    for child in &node.children {
        write_node(child, depth + 1, out);
    }
}
