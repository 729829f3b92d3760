//! AST nodes produced by the CEPL parser
//!
//! A node is a tag, its ordered children and, for leaves, the token it was
//! built from. The tag fixes how many children a node has and which tags
//! they carry; the constructors below are the only way to build a node, and
//! [`AstNode::validate`] re-checks a whole tree.

use crate::logging::{codes, Code};
use crate::tokens::{SpannedToken, Token};
use crate::utils::{Span, Spanned};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Assign,
    Relation,
    Variable,
    Kleene,
    Seq,
    Or,
    Filter,
    PredNot,
    Predicate,
    PredOp,
    VarProp,
    Property,
    Value,
    PredAnd,
    PredOr,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Assign => "ASSIGN",
            NodeKind::Relation => "RELATION",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Kleene => "KLEENE",
            NodeKind::Seq => "SEQ",
            NodeKind::Or => "OR",
            NodeKind::Filter => "FILTER",
            NodeKind::PredNot => "PRED_NOT",
            NodeKind::Predicate => "PREDICATE",
            NodeKind::PredOp => "PRED_OP",
            NodeKind::VarProp => "VAR_PROP",
            NodeKind::Property => "PROPERTY",
            NodeKind::Value => "VALUE",
            NodeKind::PredAnd => "PRED_AND",
            NodeKind::PredOr => "PRED_OR",
        }
    }

    /// Number of children a node of this kind always has
    pub fn arity(&self) -> usize {
        match self {
            NodeKind::Relation
            | NodeKind::Variable
            | NodeKind::PredOp
            | NodeKind::Property
            | NodeKind::Value => 0,
            NodeKind::Kleene | NodeKind::PredNot => 1,
            NodeKind::Assign
            | NodeKind::Seq
            | NodeKind::Or
            | NodeKind::Filter
            | NodeKind::VarProp
            | NodeKind::PredAnd
            | NodeKind::PredOr => 2,
            NodeKind::Predicate => 3,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.arity() == 0
    }

    /// Kinds that denote an event relation
    pub fn is_relation_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::Assign | NodeKind::Kleene | NodeKind::Seq | NodeKind::Or | NodeKind::Filter
        )
    }

    /// Kinds that denote a boolean filter formula
    pub fn is_formula(&self) -> bool {
        matches!(
            self,
            NodeKind::PredNot | NodeKind::Predicate | NodeKind::PredAnd | NodeKind::PredOr
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AstError {
    #[error("{kind} node has {found} children, expected {expected}")]
    WrongArity {
        kind: NodeKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind} node cannot have a {child} child at position {index}")]
    WrongChildKind {
        kind: NodeKind,
        child: NodeKind,
        index: usize,
    },

    #[error("{kind} leaf is missing its token")]
    MissingToken { kind: NodeKind },

    #[error("VALUE node is missing its number")]
    MissingValue,
}

impl AstError {
    /// A malformed tree is never the input's fault
    pub fn error_code(&self) -> Code {
        codes::system::INTERNAL_ERROR
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: NodeKind,
    pub children: Vec<AstNode>,
    /// Source token of a leaf; synthesized for VALUE nodes
    pub token: Option<SpannedToken>,
    /// Folded number of a VALUE node
    pub value: Option<f64>,
}

impl AstNode {
    fn branch(kind: NodeKind, children: Vec<AstNode>) -> Self {
        debug_assert_eq!(children.len(), kind.arity());
        Self {
            kind,
            children,
            token: None,
            value: None,
        }
    }

    /// Leaf built from a source token
    pub fn leaf(kind: NodeKind, token: SpannedToken) -> Self {
        debug_assert!(kind.is_leaf() && kind != NodeKind::Value);
        Self {
            kind,
            children: Vec::new(),
            token: Some(token),
            value: None,
        }
    }

    /// `Relation as variable`
    pub fn assign(relation: SpannedToken, variable: SpannedToken) -> Self {
        Self::branch(
            NodeKind::Assign,
            vec![
                Self::leaf(NodeKind::Relation, relation),
                Self::leaf(NodeKind::Variable, variable),
            ],
        )
    }

    pub fn kleene(inner: AstNode) -> Self {
        Self::branch(NodeKind::Kleene, vec![inner])
    }

    /// SEQ, OR, PRED_AND or PRED_OR
    pub fn binary(kind: NodeKind, left: AstNode, right: AstNode) -> Self {
        debug_assert!(matches!(
            kind,
            NodeKind::Seq | NodeKind::Or | NodeKind::PredAnd | NodeKind::PredOr
        ));
        Self::branch(kind, vec![left, right])
    }

    pub fn filter(expression: AstNode, formula: AstNode) -> Self {
        Self::branch(NodeKind::Filter, vec![expression, formula])
    }

    pub fn not(formula: AstNode) -> Self {
        Self::branch(NodeKind::PredNot, vec![formula])
    }

    /// Operands keep their source order: either side may be the VAR_PROP
    pub fn predicate(left: AstNode, operator: SpannedToken, right: AstNode) -> Self {
        Self::branch(
            NodeKind::Predicate,
            vec![left, Self::leaf(NodeKind::PredOp, operator), right],
        )
    }

    pub fn var_prop(variable: SpannedToken, property: SpannedToken) -> Self {
        Self::branch(
            NodeKind::VarProp,
            vec![
                Self::leaf(NodeKind::Variable, variable),
                Self::leaf(NodeKind::Property, property),
            ],
        )
    }

    /// VALUE leaf for a folded arithmetic operand covering `span`
    pub fn value(number: f64, span: Span) -> Self {
        Self {
            kind: NodeKind::Value,
            children: Vec::new(),
            token: Some(Spanned::new(Token::Number(format!("{:?}", number)), span)),
            value: Some(number),
        }
    }

    // === ACCESSORS ===

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.children.get(index)
    }

    /// Source text of a leaf
    pub fn text(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.value.as_cepl_string())
    }

    pub fn numeric_value(&self) -> Option<f64> {
        self.value
    }

    /// Span of the leaf token, or of all leaves below a branch
    pub fn span(&self) -> Option<Span> {
        if let Some(token) = &self.token {
            return Some(token.span);
        }
        self.children
            .iter()
            .filter_map(AstNode::span)
            .reduce(Span::merge)
    }

    /// Pre-order traversal
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a AstNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AstNode::node_count).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(AstNode::depth).max().unwrap_or(0)
    }

    /// Same kinds, texts and values throughout, ignoring source positions
    pub fn same_shape(&self, other: &AstNode) -> bool {
        self.kind == other.kind
            && self.text() == other.text()
            && self.value == other.value
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }

    // === VALIDATION ===

    /// Check arity and child kinds over the whole tree
    pub fn validate(&self) -> Result<(), AstError> {
        if self.children.len() != self.kind.arity() {
            return Err(AstError::WrongArity {
                kind: self.kind,
                expected: self.kind.arity(),
                found: self.children.len(),
            });
        }

        if self.kind.is_leaf() {
            if self.token.is_none() {
                return Err(AstError::MissingToken { kind: self.kind });
            }
            if self.kind == NodeKind::Value && self.value.is_none() {
                return Err(AstError::MissingValue);
            }
            return Ok(());
        }

        for (index, child) in self.children.iter().enumerate() {
            if !self.accepts_child(index, child.kind) {
                return Err(AstError::WrongChildKind {
                    kind: self.kind,
                    child: child.kind,
                    index,
                });
            }
            child.validate()?;
        }
        Ok(())
    }

    fn accepts_child(&self, index: usize, child: NodeKind) -> bool {
        match self.kind {
            NodeKind::Assign => child == [NodeKind::Relation, NodeKind::Variable][index],
            NodeKind::VarProp => child == [NodeKind::Variable, NodeKind::Property][index],
            NodeKind::Kleene | NodeKind::Seq | NodeKind::Or => child.is_relation_expression(),
            NodeKind::Filter => match index {
                0 => child.is_relation_expression(),
                _ => child.is_formula(),
            },
            NodeKind::PredNot | NodeKind::PredAnd | NodeKind::PredOr => child.is_formula(),
            NodeKind::Predicate => {
                let operands = (self.children[0].kind, self.children[2].kind);
                let ordered = operands == (NodeKind::VarProp, NodeKind::Value)
                    || operands == (NodeKind::Value, NodeKind::VarProp);
                match index {
                    1 => child == NodeKind::PredOp,
                    _ => ordered,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::ComparisonOp;
    use crate::utils::Span;
    use assert_matches::assert_matches;

    fn tok(token: Token) -> SpannedToken {
        Spanned::new(token, Span::dummy())
    }

    fn assign(relation: &str, variable: &str) -> AstNode {
        AstNode::assign(
            tok(Token::Relation(relation.to_string())),
            tok(Token::Word(variable.to_string())),
        )
    }

    fn predicate() -> AstNode {
        AstNode::predicate(
            AstNode::var_prop(tok(Token::Word("x".to_string())), tok(Token::Word("p".to_string()))),
            tok(Token::Comparison(ComparisonOp::GreaterThan)),
            AstNode::value(5.0, Span::dummy()),
        )
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(NodeKind::Assign.arity(), 2);
        assert_eq!(NodeKind::Kleene.arity(), 1);
        assert_eq!(NodeKind::Predicate.arity(), 3);
        assert!(NodeKind::Value.is_leaf());
        assert_eq!(NodeKind::PredAnd.name(), "PRED_AND");
    }

    #[test]
    fn test_assign_children() {
        let node = assign("R", "x");
        assert_eq!(node.kind, NodeKind::Assign);
        assert_eq!(node.children[0].kind, NodeKind::Relation);
        assert_eq!(node.children[0].text().as_deref(), Some("R"));
        assert_eq!(node.children[1].kind, NodeKind::Variable);
        assert_eq!(node.children[1].text().as_deref(), Some("x"));
        assert!(node.validate().is_ok());
    }

    #[test]
    fn test_value_node_carries_number_and_text() {
        let node = AstNode::value(11.0, Span::dummy());
        assert_eq!(node.numeric_value(), Some(11.0));
        assert_eq!(node.text().as_deref(), Some("11.0"));
    }

    #[test]
    fn test_validate_accepts_full_tree() {
        let tree = AstNode::binary(
            NodeKind::Seq,
            AstNode::filter(AstNode::kleene(assign("A", "a")), predicate()),
            AstNode::binary(NodeKind::Or, assign("B", "b"), assign("C", "c")),
        );
        assert!(tree.validate().is_ok());
        assert_eq!(tree.node_count(), 19);
        assert_eq!(tree.depth(), 5);
    }

    #[test]
    fn test_validate_rejects_misplaced_children() {
        let formula_as_relation = AstNode::kleene(predicate());
        assert_matches!(
            formula_as_relation.validate(),
            Err(AstError::WrongChildKind { kind: NodeKind::Kleene, index: 0, .. })
        );

        let mut broken = assign("A", "a");
        broken.children.pop();
        assert_matches!(broken.validate(), Err(AstError::WrongArity { found: 1, .. }));

        let mut two_values = predicate();
        two_values.children[0] = AstNode::value(1.0, Span::dummy());
        assert_matches!(two_values.validate(), Err(AstError::WrongChildKind { .. }));
    }

    #[test]
    fn test_json_round_trip_preserves_tree() {
        let tree = AstNode::filter(assign("A", "a"), predicate());
        let json = serde_json::to_string(&tree).unwrap();
        let restored: AstNode = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tree);
    }
}
