//! Filter formulas attached with `filter`
//!
//! ```text
//! formula   ::= operand (connective operand)*
//! operand   ::= "not" formula
//!             | "(" formula ")"
//!             | var_prop PRED_OP arithmetic
//!             | arithmetic PRED_OP var_prop
//! var_prop  ::= WORD "." WORD
//! ```
//!
//! Connective chaining follows [`FILTER_CONNECTIVES`]. `not` takes a whole
//! formula, so `not p and q` is `PRED_NOT(PRED_AND(p, q))`.

use super::arithmetic::parse_arithmetic_value;
use super::atomic::{expect_comparison, expect_token, expect_word, nested, Parser};
use crate::grammar::ast::{AstNode, NodeKind};
use crate::grammar::precedence::{climb, filter_connective, FILTER_CONNECTIVES};
use crate::syntax::SyntaxResult;
use crate::tokens::Token;

pub fn parse_filter_formula(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let first = parse_filter_operand(parser)?;
    climb(
        parser,
        FILTER_CONNECTIVES.associativity,
        first,
        &filter_connective,
        &mut parse_filter_operand,
        &|kind: NodeKind, left: AstNode, right: AstNode| AstNode::binary(kind, left, right),
    )
}

fn parse_filter_operand(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    match parser.current_token() {
        Token::Not => nested(parser, |p| {
            p.advance();
            Ok(AstNode::not(parse_filter_formula(p)?))
        }),
        Token::LeftParen => nested(parser, |p| {
            p.advance();
            let inner = parse_filter_formula(p)?;
            expect_token(p, &Token::RightParen, "')'")?;
            Ok(inner)
        }),
        Token::Word(_) => {
            let property = parse_var_prop(parser)?;
            let operator = expect_comparison(parser)?;
            let value = parse_arithmetic_value(parser)?;
            Ok(AstNode::predicate(property, operator, value))
        }
        _ => {
            let value = parse_arithmetic_value(parser)?;
            let operator = expect_comparison(parser)?;
            let property = parse_var_prop(parser)?;
            Ok(AstNode::predicate(value, operator, property))
        }
    }
}

/// `variable.property`
pub fn parse_var_prop(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let variable = expect_word(parser, "variable name")?;
    expect_token(parser, &Token::Dot, "'.'")?;
    let property = expect_word(parser, "property name")?;
    Ok(AstNode::var_prop(variable, property))
}
