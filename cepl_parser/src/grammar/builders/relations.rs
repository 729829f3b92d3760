//! Relation expressions
//!
//! ```text
//! cepl     ::= operand (( ":" | "|" ) operand)*
//! operand  ::= term "+"? ("filter" formula)?
//! term     ::= "(" cepl ")" | RELATION "as" WORD
//! ```
//!
//! `+` applies once; a second `+` is left for the caller to reject. A
//! filter attaches to the repeated relation when both are present.

use super::atomic::{expect_token, expect_word, nested, Parser};
use super::filters::parse_filter_formula;
use crate::grammar::ast::{AstNode, NodeKind};
use crate::grammar::precedence::{climb, relation_operator, RELATION_OPERATORS};
use crate::syntax::SyntaxResult;
use crate::tokens::Token;

pub fn parse_cepl(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let first = parse_relation_operand(parser)?;
    climb(
        parser,
        RELATION_OPERATORS.associativity,
        first,
        &relation_operator,
        &mut parse_relation_operand,
        &|kind: NodeKind, left: AstNode, right: AstNode| AstNode::binary(kind, left, right),
    )
}

/// Term with its optional Kleene marker and filter
pub fn parse_relation_operand(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let mut node = parse_expression_term(parser)?;

    if parser.current_token() == &Token::Plus {
        parser.advance();
        node = AstNode::kleene(node);
    }

    if parser.current_token() == &Token::Filter {
        parser.advance();
        let formula = parse_filter_formula(parser)?;
        node = AstNode::filter(node, formula);
    }

    Ok(node)
}

pub fn parse_expression_term(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    match parser.current_token() {
        Token::LeftParen => nested(parser, |p| {
            p.advance();
            let inner = parse_cepl(p)?;
            expect_token(p, &Token::RightParen, "')'")?;
            Ok(inner)
        }),
        Token::Relation(_) => parse_relation_binding(parser),
        _ => Err(parser.unexpected("'(' or relation name")),
    }
}

/// `Relation as variable`
fn parse_relation_binding(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let relation = parser.current().clone();
    parser.advance();
    expect_token(parser, &Token::As, "'as'")?;
    let variable = expect_word(parser, "variable name")?;
    Ok(AstNode::assign(relation, variable))
}
