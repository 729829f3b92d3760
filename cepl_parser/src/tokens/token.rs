//! CEPL token kinds
//!
//! Keywords are matched case-insensitively by the lexer. Words that start
//! with an uppercase letter name relations, all other words name variables
//! or properties.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operators allowed between a property and a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    Equals,             // ==
    NotEquals,          // !=
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Equals => "==",
            Self::NotEquals => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "==" => Some(Self::Equals),
            "!=" => Some(Self::NotEquals),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // Grouping
    LeftParen,  // (
    RightParen, // )

    // Relation binding
    Relation(String),
    As,
    Word(String),

    // Relation operators
    Plus,  // + (Kleene, or addition inside arithmetic)
    Colon, // :
    Pipe,  // |

    // Filters
    Filter,
    Not,
    /// `and` / `or`, text normalized to lowercase
    FilterOp(String),
    Comparison(ComparisonOp),
    Dot,

    // Arithmetic
    Minus,
    Multiply,
    Divide,
    /// Numeric literal as written
    Number(String),

    // Trivia
    Space,
    Tab,
    Newline,
    Comment(String),

    Eof,
}

/// Coarse token classes used by lexical metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenClass {
    Delimiter,
    Keyword,
    Identifier,
    Operator,
    Literal,
    Trivia,
    EndOfInput,
}

impl Token {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Space | Token::Tab | Token::Newline | Token::Comment(_)
        )
    }

    /// Tokens the parser sees; EOF is significant
    pub fn is_significant(&self) -> bool {
        !self.is_trivia()
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    pub fn token_class(&self) -> TokenClass {
        match self {
            Token::LeftParen | Token::RightParen | Token::Dot => TokenClass::Delimiter,
            Token::As | Token::Filter | Token::Not | Token::FilterOp(_) => TokenClass::Keyword,
            Token::Relation(_) | Token::Word(_) => TokenClass::Identifier,
            Token::Plus
            | Token::Colon
            | Token::Pipe
            | Token::Comparison(_)
            | Token::Minus
            | Token::Multiply
            | Token::Divide => TokenClass::Operator,
            Token::Number(_) => TokenClass::Literal,
            Token::Space | Token::Tab | Token::Newline | Token::Comment(_) => TokenClass::Trivia,
            Token::Eof => TokenClass::EndOfInput,
        }
    }

    /// Token kind name as used in diagnostics and token dumps
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::LeftParen => "LEFT_PAREN",
            Token::RightParen => "RIGHT_PAREN",
            Token::Relation(_) => "RELATION",
            Token::As => "AS",
            Token::Word(_) => "WORD",
            Token::Plus => "PLUS",
            Token::Colon => "COLON",
            Token::Pipe => "OR",
            Token::Filter => "FILTER",
            Token::Not => "NOT",
            Token::FilterOp(_) => "FILT_OP",
            Token::Comparison(_) => "PRED_OP",
            Token::Dot => "DOT",
            Token::Minus => "MINUS",
            Token::Multiply => "MULT",
            Token::Divide => "DIV",
            Token::Number(_) => "NUMBER",
            Token::Space => "SPACE",
            Token::Tab => "TAB",
            Token::Newline => "NEWLINE",
            Token::Comment(_) => "COMMENT",
            Token::Eof => "EOF",
        }
    }

    /// Source text of the token; empty for EOF
    pub fn as_cepl_string(&self) -> String {
        match self {
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Relation(name) | Token::Word(name) => name.clone(),
            Token::As => "as".to_string(),
            Token::Plus => "+".to_string(),
            Token::Colon => ":".to_string(),
            Token::Pipe => "|".to_string(),
            Token::Filter => "filter".to_string(),
            Token::Not => "not".to_string(),
            Token::FilterOp(text) => text.clone(),
            Token::Comparison(op) => op.as_str().to_string(),
            Token::Dot => ".".to_string(),
            Token::Minus => "-".to_string(),
            Token::Multiply => "*".to_string(),
            Token::Divide => "/".to_string(),
            Token::Number(lexeme) => lexeme.clone(),
            Token::Space => " ".to_string(),
            Token::Tab => "\t".to_string(),
            Token::Newline => "\n".to_string(),
            Token::Comment(text) => format!("#{}", text),
            Token::Eof => String::new(),
        }
    }

    /// Fixed text of punctuation and operator tokens, used by operator tables
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Token::LeftParen => Some("("),
            Token::RightParen => Some(")"),
            Token::Plus => Some("+"),
            Token::Colon => Some(":"),
            Token::Pipe => Some("|"),
            Token::Dot => Some("."),
            Token::Minus => Some("-"),
            Token::Multiply => Some("*"),
            Token::Divide => Some("/"),
            Token::Comparison(op) => Some(op.as_str()),
            _ => None,
        }
    }

    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Eof => "<EOF>".to_string(),
            other => other.as_cepl_string(),
        }
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&str> {
        match self {
            Token::Relation(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Relation(_)
            | Token::Word(_)
            | Token::FilterOp(_)
            | Token::Comparison(_)
            | Token::Number(_) => write!(f, "{}({})", self.kind_name(), self.as_cepl_string()),
            _ => f.write_str(self.kind_name()),
        }
    }
}

/// Classify an identifier-shaped word into a keyword, relation or word token
pub fn classify_word(word: &str) -> Token {
    match word.to_ascii_lowercase().as_str() {
        "as" => Token::As,
        "filter" => Token::Filter,
        "not" => Token::Not,
        lowered @ ("and" | "or") => Token::FilterOp(lowered.to_string()),
        _ if word.starts_with(|c: char| c.is_ascii_uppercase()) => {
            Token::Relation(word.to_string())
        }
        _ => Token::Word(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(classify_word("AS"), Token::As);
        assert_eq!(classify_word("Filter"), Token::Filter);
        assert_eq!(classify_word("NOT"), Token::Not);
        assert_eq!(classify_word("OR"), Token::FilterOp("or".to_string()));
        assert_eq!(classify_word("And"), Token::FilterOp("and".to_string()));
    }

    #[test]
    fn test_relation_and_word_classification() {
        assert_eq!(classify_word("Stock"), Token::Relation("Stock".to_string()));
        assert_eq!(classify_word("stock"), Token::Word("stock".to_string()));
        assert_eq!(classify_word("_tmp"), Token::Word("_tmp".to_string()));
    }

    #[test]
    fn test_trivia_is_not_significant() {
        assert!(!Token::Space.is_significant());
        assert!(!Token::Comment("note".to_string()).is_significant());
        assert!(Token::Eof.is_significant());
        assert_eq!(Token::Eof.token_class(), TokenClass::EndOfInput);
    }

    #[test]
    fn test_display_and_source_text() {
        assert_eq!(Token::Word("x".to_string()).to_string(), "WORD(x)");
        assert_eq!(Token::Pipe.to_string(), "OR");
        assert_eq!(
            Token::Comparison(ComparisonOp::GreaterThanOrEqual).as_cepl_string(),
            ">="
        );
        assert_eq!(Token::Eof.describe(), "<EOF>");
        assert_eq!(Token::Pipe.symbol(), Some("|"));
        assert_eq!(Token::Word("x".to_string()).symbol(), None);
    }

    #[test]
    fn test_comparison_symbols() {
        assert_eq!(ComparisonOp::from_symbol("!="), Some(ComparisonOp::NotEquals));
        assert_eq!(ComparisonOp::from_symbol("="), None);
    }
}
