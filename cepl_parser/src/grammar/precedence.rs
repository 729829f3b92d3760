//! Operator tables for every binary layer of the grammar
//!
//! Each layer lists its operators with the node or operation they produce
//! and records its associativity. [`climb`] folds an operand chain according
//! to that associativity, so changing a table entry changes how chains
//! group without touching the builders.
//!
//! All three CEPL layers are right-associative with a single precedence
//! level per table:
//!
//! ```text
//! a : b | c             => SEQ(a, OR(b, c))
//! p and q or r          => PRED_AND(p, PRED_OR(q, r))
//! 10 - 2 - 3            => 10 - (2 - 3) = 11
//! ```

use super::ast::NodeKind;
use super::builders::atomic::{nested, Parser};
use crate::syntax::SyntaxResult;
use crate::tokens::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` groups as `(a op b) op c`
    Left,
    /// `a op b op c` groups as `a op (b op c)`
    Right,
}

/// Whether an operand position accepts a single leading `-`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSign {
    Unsigned,
    Signed,
}

/// One precedence level: operator text to what it produces
#[derive(Debug, Clone, Copy)]
pub struct OperatorTable<Op: 'static> {
    pub operators: &'static [(&'static str, Op)],
    /// Produced by any accepted token whose text matches no row
    pub fallback: Option<Op>,
    pub associativity: Associativity,
}

impl<Op: Copy> OperatorTable<Op> {
    pub fn lookup(&self, text: &str) -> Option<Op> {
        self.operators
            .iter()
            .find(|(symbol, _)| *symbol == text)
            .map(|(_, op)| *op)
            .or(self.fallback)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operators.iter().map(|(symbol, _)| *symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// IEEE semantics; division by zero yields infinity or NaN
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            ArithOp::Add => left + right,
            ArithOp::Sub => left - right,
            ArithOp::Mul => left * right,
            ArithOp::Div => left / right,
        }
    }
}

/// Arithmetic level with the sign rule of its first and later operands
#[derive(Debug, Clone, Copy)]
pub struct ArithLevel {
    pub table: OperatorTable<ArithOp>,
    pub head: OperandSign,
    pub tail: OperandSign,
}

/// `:` and `|`, matched on punctuation tokens
pub static RELATION_OPERATORS: OperatorTable<NodeKind> = OperatorTable {
    operators: &[(":", NodeKind::Seq), ("|", NodeKind::Or)],
    fallback: None,
    associativity: Associativity::Right,
};

/// `and`/`or`, matched on FILT_OP text; unknown text combines as PRED_AND
///
/// Rows are lowercase because the lexer lowercases FILT_OP text, which makes
/// `OR` and `Or` select PRED_OR as well.
pub static FILTER_CONNECTIVES: OperatorTable<NodeKind> = OperatorTable {
    operators: &[("or", NodeKind::PredOr)],
    fallback: Some(NodeKind::PredAnd),
    associativity: Associativity::Right,
};

/// Loosest level first. A signed sum operand negates a whole product; a
/// product chain only accepts a sign after its first factor.
pub static ARITHMETIC_LEVELS: &[ArithLevel] = &[
    ArithLevel {
        table: OperatorTable {
            operators: &[("+", ArithOp::Add), ("-", ArithOp::Sub)],
            fallback: None,
            associativity: Associativity::Right,
        },
        head: OperandSign::Signed,
        tail: OperandSign::Signed,
    },
    ArithLevel {
        table: OperatorTable {
            operators: &[("*", ArithOp::Mul), ("/", ArithOp::Div)],
            fallback: None,
            associativity: Associativity::Right,
        },
        head: OperandSign::Unsigned,
        tail: OperandSign::Signed,
    },
];

/// Relation operator for a punctuation token
pub fn relation_operator(token: &Token) -> Option<NodeKind> {
    token
        .symbol()
        .and_then(|symbol| RELATION_OPERATORS.lookup(symbol))
}

/// Connective for a FILT_OP token
pub fn filter_connective(token: &Token) -> Option<NodeKind> {
    match token {
        Token::FilterOp(text) => FILTER_CONNECTIVES.lookup(text),
        _ => None,
    }
}

/// Fold `first (op operand)*` according to `associativity`
///
/// `operator` inspects the current token without consuming it; the operator
/// token is consumed here before `operand` is called. Every operator nests
/// the result one level deeper and is counted against the parser's limit.
pub fn climb<T, Op>(
    parser: &mut dyn Parser,
    associativity: Associativity,
    first: T,
    operator: &dyn Fn(&Token) -> Option<Op>,
    operand: &mut dyn FnMut(&mut dyn Parser) -> SyntaxResult<T>,
    combine: &dyn Fn(Op, T, T) -> T,
) -> SyntaxResult<T> {
    match associativity {
        Associativity::Left => {
            let mut acc = first;
            let mut levels = 0;
            while let Some(op) = operator(parser.current_token()) {
                parser.enter()?;
                levels += 1;
                parser.advance();
                let rhs = operand(parser)?;
                acc = combine(op, acc, rhs);
            }
            for _ in 0..levels {
                parser.leave();
            }
            Ok(acc)
        }
        Associativity::Right => {
            let Some(op) = operator(parser.current_token()) else {
                return Ok(first);
            };
            let rhs = nested(parser, |p| {
                p.advance();
                let next = operand(p)?;
                climb(p, associativity, next, operator, operand, combine)
            })?;
            Ok(combine(op, first, rhs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::CeplParser;

    fn number(parser: &mut dyn Parser) -> SyntaxResult<f64> {
        match parser.current_token() {
            Token::Number(lexeme) => {
                let value = lexeme.parse().unwrap();
                parser.advance();
                Ok(value)
            }
            _ => Err(parser.unexpected("number")),
        }
    }

    fn fold(source: &str, associativity: Associativity) -> f64 {
        let mut parser = CeplParser::new("t", tokenize("t", source).unwrap());
        let first = number(&mut parser).unwrap();
        climb(
            &mut parser,
            associativity,
            first,
            &|token: &Token| match token {
                Token::Minus => Some(ArithOp::Sub),
                _ => None,
            },
            &mut number,
            &|op: ArithOp, l: f64, r: f64| op.apply(l, r),
        )
        .unwrap()
    }

    #[test]
    fn test_climb_honours_associativity() {
        assert_eq!(fold("2 - 3 - 4", Associativity::Right), 3.0);
        assert_eq!(fold("2 - 3 - 4", Associativity::Left), -5.0);
        assert_eq!(fold("7", Associativity::Right), 7.0);
    }

    #[test]
    fn test_relation_table() {
        assert_eq!(relation_operator(&Token::Colon), Some(NodeKind::Seq));
        assert_eq!(relation_operator(&Token::Pipe), Some(NodeKind::Or));
        assert_eq!(relation_operator(&Token::Plus), None);
        assert_eq!(relation_operator(&Token::Eof), None);
        assert_eq!(RELATION_OPERATORS.symbols().collect::<Vec<_>>(), vec![":", "|"]);
    }

    #[test]
    fn test_connective_table() {
        assert_eq!(
            filter_connective(&Token::FilterOp("or".to_string())),
            Some(NodeKind::PredOr)
        );
        assert_eq!(
            filter_connective(&Token::FilterOp("and".to_string())),
            Some(NodeKind::PredAnd)
        );
        assert_eq!(filter_connective(&Token::Word("or".to_string())), None);
    }

    #[test]
    fn test_arithmetic_levels() {
        assert_eq!(ARITHMETIC_LEVELS.len(), 2);
        assert_eq!(ARITHMETIC_LEVELS[0].table.lookup("-"), Some(ArithOp::Sub));
        assert_eq!(ARITHMETIC_LEVELS[1].table.lookup("-"), None);
        assert_eq!(ARITHMETIC_LEVELS[1].head, OperandSign::Unsigned);
        assert!(ArithOp::Div.apply(1.0, 0.0).is_infinite());
        assert!(ArithOp::Div.apply(0.0, 0.0).is_nan());
    }
}
