//! Token cursor driving the grammar builders

use crate::config::constants::compile_time::syntax::MAX_RECURSION_DEPTH;
use crate::grammar::ast::AstNode;
use crate::grammar::builders::{atomic::Parser, parse_cepl};
use crate::syntax::error::SyntaxResult;
use crate::tokens::{SpannedToken, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error};

/// Parser over the significant tokens of one source
pub struct CeplParser {
    source_name: String,
    tokens: TokenStream,
    last_span: Span,
    depth: usize,
}

impl CeplParser {
    pub fn new(source_name: impl Into<String>, tokens: TokenStream) -> Self {
        let last_span = Span::point(tokens.current_span().start);
        Self {
            source_name: source_name.into(),
            tokens,
            last_span,
            depth: 0,
        }
    }

    /// Parse one CEPL expression that must span the whole input
    pub fn parse(&mut self) -> SyntaxResult<AstNode> {
        log_debug!("Starting CEPL parse",
            "source" => self.source_name,
            "tokens" => self.tokens.len()
        );

        self.depth = 0;
        let ast = parse_cepl(self)?;

        if !self.tokens.is_at_end() {
            let error = self.unexpected("end of input");
            log_error!(error.error_code(), "Trailing input after complete expression",
                span = error.span(),
                "found" => error.found()
            );
            return Err(error);
        }

        // Builders only use the typed constructors
        debug_assert!(ast.validate().is_ok(), "parser produced a malformed tree");

        Ok(ast)
    }

    pub fn is_at_end(&self) -> bool {
        self.tokens.is_at_end()
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn into_tokens(self) -> TokenStream {
        self.tokens
    }
}

impl Parser for CeplParser {
    fn current(&self) -> &SpannedToken {
        self.tokens.current()
    }

    fn advance(&mut self) {
        self.last_span = self.tokens.current_span();
        self.tokens.advance();
    }

    fn last_span(&self) -> Span {
        self.last_span
    }

    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn enter(&mut self) -> SyntaxResult<()> {
        if self.depth >= MAX_RECURSION_DEPTH {
            let expected = format!("expression nested at most {} levels deep", MAX_RECURSION_DEPTH);
            return Err(self.unexpected(&expected));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl std::fmt::Debug for CeplParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CeplParser")
            .field("source_name", &self.source_name)
            .field("tokens", &self.tokens.diagnostic())
            .field("depth", &self.depth)
            .finish()
    }
}
