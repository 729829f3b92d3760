//! Variable resolution
//!
//! Runs after parsing. Every `variable.property` reference in a filter must
//! name a variable bound by some `Relation as variable` in the same query.
//! Bindings are visible across the whole query, so a filter may refer to a
//! variable bound later in a sequence.

use crate::grammar::ast::{AstNode, NodeKind};
use crate::logging::codes;
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};

pub mod error;
pub mod types;

pub use error::{ResolutionError, ResolutionResult};
pub use types::{VariableInfo, VariableTable};

/// Build the variable table of a query, rejecting references to unbound variables
pub fn resolve_variables(ast: &AstNode) -> ResolutionResult<VariableTable> {
    log_debug!("Starting variable resolution", "nodes" => ast.node_count());

    let mut table = VariableTable::new();
    let mut references: Vec<(String, String, Span)> = Vec::new();

    ast.walk(&mut |node| match node.kind {
        NodeKind::Assign => {
            if let (Some(relation), Some(variable)) = (node.child(0), node.child(1)) {
                let relation = relation.text().unwrap_or_default();
                let name = variable.text().unwrap_or_default();
                let span = variable.span().unwrap_or_else(Span::dummy);
                if table.bind(&name, &relation, span) {
                    log_warning!(code = codes::references::VARIABLE_REBOUND,
                        "Variable bound to more than one relation",
                        "variable" => name,
                        "relation" => relation,
                        "at" => span
                    );
                }
            }
        }
        NodeKind::VarProp => {
            if let (Some(variable), Some(property)) = (node.child(0), node.child(1)) {
                references.push((
                    variable.text().unwrap_or_default(),
                    property.text().unwrap_or_default(),
                    variable.span().unwrap_or_else(Span::dummy),
                ));
            }
        }
        _ => {}
    });

    for (name, property, span) in &references {
        if !table.reference(name, property) {
            let error = ResolutionError::undefined_variable(name, *span);
            log_error!(error.error_code(), "Reference to unbound variable",
                span = *span,
                "variable" => name,
                "property" => property
            );
            return Err(error);
        }
    }

    log_success!(codes::success::REFERENCE_RESOLUTION_COMPLETE,
        "Variable resolution completed",
        "variables" => table.len(),
        "references" => references.len()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{init_global_logging_with_service, LoggingService, MemoryLogger, LogLevel};
    use crate::syntax::parse_source;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn resolve(source: &str) -> ResolutionResult<VariableTable> {
        resolve_variables(&parse_source("q", source).unwrap())
    }

    #[test]
    fn test_collects_bindings_in_order() {
        let table = resolve("Buy as b : Sell as s filter s.price > 10 and b.qty < 5").unwrap();
        assert_eq!(table.len(), 2);

        let buy = table.get("b").unwrap();
        assert_eq!(buy.id, 0);
        assert_eq!(buy.relations, vec!["Buy".to_string()]);
        assert!(buy.properties.contains("qty"));

        let sell = table.by_id(1).unwrap();
        assert_eq!(sell.name, "s");
        assert_eq!(sell.binding_span.start.column, 20);
        assert_eq!(table.property_reference_count(), 2);
    }

    #[test]
    fn test_forward_reference_is_allowed() {
        let table = resolve("(A as a filter b.v > 1) : B as b").unwrap();
        assert!(table.get("b").unwrap().properties.contains("v"));
    }

    #[test]
    fn test_undefined_variable() {
        let error = resolve("A as a filter z.v > 1").unwrap_err();
        assert_matches!(
            &error,
            ResolutionError::UndefinedVariable { name, span } if name == "z" && span.start.column == 15
        );
        assert_eq!(error.error_code().as_str(), "E110");
    }

    #[test]
    fn test_variable_bound_in_both_alternatives() {
        let table = resolve("(A as x | B as x) filter x.v > 0").unwrap();
        let x = table.get("x").unwrap();
        assert_eq!(x.relations, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(x.binding_count, 2);
        assert!(x.is_rebound());
    }

    #[test]
    fn test_rebinding_is_logged_as_warning() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);
        let _ = init_global_logging_with_service(Arc::new(service));

        resolve("A as x : B as x").unwrap();

        // Another test may have installed the global logger first
        if logger.event_count() > 0 {
            assert!(logger.has_event_with_code(codes::references::VARIABLE_REBOUND));
        }
    }

    #[test]
    fn test_same_relation_twice_is_not_a_rebind() {
        let table = resolve("A as x : A as x").unwrap();
        let x = table.get("x").unwrap();
        assert_eq!(x.binding_count, 2);
        assert!(!x.is_rebound());
    }
}
