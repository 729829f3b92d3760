//! Arithmetic operands of predicates
//!
//! Arithmetic is evaluated while it is parsed; a predicate only ever holds
//! the folded number as a VALUE leaf. Operands are numeric literals and
//! parenthesized sub-expressions, never variables.

use super::atomic::{expect_token, nested, Parser};
use crate::grammar::ast::AstNode;
use crate::grammar::precedence::{climb, ArithLevel, ArithOp, OperandSign, ARITHMETIC_LEVELS};
use crate::syntax::SyntaxResult;
use crate::tokens::Token;

/// Parse and fold an arithmetic expression into a VALUE node spanning its source
pub fn parse_arithmetic_value(parser: &mut dyn Parser) -> SyntaxResult<AstNode> {
    let start = parser.current_span();
    let number = evaluate_arithmetic(parser, ARITHMETIC_LEVELS)?;
    Ok(AstNode::value(number, start.merge(parser.last_span())))
}

/// Fold an arithmetic expression using `levels`, loosest level first
pub fn evaluate_arithmetic(parser: &mut dyn Parser, levels: &[ArithLevel]) -> SyntaxResult<f64> {
    parse_level(parser, levels, 0)
}

fn parse_level(parser: &mut dyn Parser, levels: &[ArithLevel], depth: usize) -> SyntaxResult<f64> {
    let Some(level) = levels.get(depth) else {
        return parse_primary(parser, levels);
    };

    let first = parse_operand(parser, levels, depth, level.head)?;
    climb(
        parser,
        level.table.associativity,
        first,
        &|token: &Token| token.symbol().and_then(|symbol| level.table.lookup(symbol)),
        &mut |p: &mut dyn Parser| parse_operand(p, levels, depth, level.tail),
        &|op: ArithOp, left: f64, right: f64| op.apply(left, right),
    )
}

/// Operand of `levels[depth]`: an optional single `-` then the next tighter level
fn parse_operand(
    parser: &mut dyn Parser,
    levels: &[ArithLevel],
    depth: usize,
    sign: OperandSign,
) -> SyntaxResult<f64> {
    if sign == OperandSign::Signed && parser.current_token() == &Token::Minus {
        parser.advance();
        return Ok(-parse_level(parser, levels, depth + 1)?);
    }
    parse_level(parser, levels, depth + 1)
}

/// number | `(` expression `)`
fn parse_primary(parser: &mut dyn Parser, levels: &[ArithLevel]) -> SyntaxResult<f64> {
    match parser.current_token() {
        Token::LeftParen => nested(parser, |p| {
            p.advance();
            let value = parse_level(p, levels, 0)?;
            expect_token(p, &Token::RightParen, "')'")?;
            Ok(value)
        }),
        Token::Number(lexeme) => {
            let value = lexeme
                .parse::<f64>()
                .map_err(|_| parser.unexpected("number"))?;
            parser.advance();
            Ok(value)
        }
        _ => Err(parser.unexpected("number or '('")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::NodeKind;
    use crate::grammar::precedence::{Associativity, OperatorTable};
    use crate::lexical::tokenize;
    use crate::syntax::{CeplParser, SyntaxError};
    use assert_matches::assert_matches;

    fn parser(source: &str) -> CeplParser {
        CeplParser::new("expr", tokenize("expr", source).unwrap())
    }

    fn eval(source: &str) -> f64 {
        let mut p = parser(source);
        let value = evaluate_arithmetic(&mut p, ARITHMETIC_LEVELS).unwrap();
        assert!(p.is_at_end(), "trailing input in {:?}", source);
        value
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("2 * 3 + 4"), 10.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("1.5e1"), 15.0);
    }

    #[test]
    fn test_right_associative_chains() {
        assert_eq!(eval("10 - 2 - 3"), 11.0);
        assert_eq!(eval("2 - 3 - 4"), 3.0);
        assert_eq!(eval("10 - 2 + 3"), 5.0);
        assert_eq!(eval("8 / 4 / 2"), 4.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("-3"), -3.0);
        assert_eq!(eval("-2 * 3"), -6.0);
        assert_eq!(eval("2 * -3"), -6.0);
        assert_eq!(eval("2 - -3"), 5.0);
        assert_eq!(eval("-(1 + 2)"), -3.0);
    }

    #[test]
    fn test_repeated_minus_is_rejected() {
        let mut p = parser("- -3");
        let error = evaluate_arithmetic(&mut p, ARITHMETIC_LEVELS).unwrap_err();
        assert_matches!(
            error,
            SyntaxError::UnexpectedToken { ref found, span, .. } if found == "-" && span.start.column == 3
        );
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        assert!(eval("1 / 0").is_infinite());
        assert!(eval("0 / 0").is_nan());
    }

    #[test]
    fn test_missing_operand_errors_at_lookahead() {
        let mut p = parser("1 +");
        let error = evaluate_arithmetic(&mut p, ARITHMETIC_LEVELS).unwrap_err();
        assert_eq!(error.found(), "<EOF>");
        assert_eq!(error.expected(), "number or '('");

        let mut p = parser("(1 + 2");
        assert_eq!(
            evaluate_arithmetic(&mut p, ARITHMETIC_LEVELS).unwrap_err().expected(),
            "')'"
        );
    }

    #[test]
    fn test_left_associative_table() {
        static LEFT_LEVELS: &[ArithLevel] = &[ArithLevel {
            table: OperatorTable {
                operators: &[("+", ArithOp::Add), ("-", ArithOp::Sub)],
                fallback: None,
                associativity: Associativity::Left,
            },
            head: OperandSign::Signed,
            tail: OperandSign::Signed,
        }];

        let mut p = parser("2 - 3 - 4");
        assert_eq!(evaluate_arithmetic(&mut p, LEFT_LEVELS).unwrap(), -5.0);
    }

    #[test]
    fn test_value_node_spans_expression() {
        let mut p = parser("(1 + 2) * 3 == ");
        let node = parse_arithmetic_value(&mut p).unwrap();
        assert_eq!(node.kind, NodeKind::Value);
        assert_eq!(node.numeric_value(), Some(9.0));
        assert_eq!(node.text().as_deref(), Some("9.0"));

        let span = node.span().unwrap();
        assert_eq!(span.start.column, 1);
        assert_eq!(span.end.column, 12);
    }
}
