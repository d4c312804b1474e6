//! Aggregate function visitor for the parser module.
//! Uses sqlparser's visitor pattern to find aggregate calls inside an expression.
//! Identical calls are reported once, in first-seen order.

use crate::aggregate_registry::AggregateRegistry;
use sqlparser::ast::{Expr, Visit, Visitor};
use std::collections::HashSet;
use std::ops::ControlFlow;

/// An aggregate call found in an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCallRef {
    /// Function name as written
    pub function_name: String,
    /// The whole `Expr::Function` node
    pub expr: Expr,
}

/// Visitor that collects aggregate functions from SQL expressions
pub struct AggregateVisitor<'a> {
    /// Found aggregate calls, in traversal order
    pub aggregates: Vec<AggregateCallRef>,
    /// Debug renderings already seen, used for duplicate detection
    seen: HashSet<String>,
    aggregate_registry: &'a dyn AggregateRegistry,
}

impl<'a> AggregateVisitor<'a> {
    pub fn new(aggregate_registry: &'a dyn AggregateRegistry) -> Self {
        Self {
            aggregates: Vec::new(),
            seen: HashSet::new(),
            aggregate_registry,
        }
    }

    pub fn into_aggregates(self) -> Vec<AggregateCallRef> {
        self.aggregates
    }
}

impl Visitor for AggregateVisitor<'_> {
    type Break = ();

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<()> {
        if let Expr::Function(func) = expr {
            let func_name = func.name.to_string();
            if self.aggregate_registry.is_aggregate_function(&func_name)
                && self.seen.insert(format!("{:?}", expr))
            {
                self.aggregates.push(AggregateCallRef {
                    function_name: func_name,
                    expr: expr.clone(),
                });
            }
        }
        ControlFlow::Continue(())
    }
}

/// Extract aggregate calls from an expression, outermost first.
///
/// Calls nested inside other aggregate calls are reported too, so callers
/// can reject them.
pub fn extract_aggregates_with_visitor(
    expr: &Expr,
    aggregate_registry: &dyn AggregateRegistry,
) -> Vec<AggregateCallRef> {
    let mut visitor = AggregateVisitor::new(aggregate_registry);
    let _ = expr.visit(&mut visitor);
    visitor.into_aggregates()
}

/// Check if an expression contains aggregate functions using visitor
pub fn contains_aggregates_with_visitor(
    expr: &Expr,
    aggregate_registry: &dyn AggregateRegistry,
) -> bool {
    struct AggregateFinder<'a>(&'a dyn AggregateRegistry);

    impl Visitor for AggregateFinder<'_> {
        type Break = ();

        fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<()> {
            match expr {
                Expr::Function(func) if self.0.is_aggregate_function(&func.name.to_string()) => {
                    ControlFlow::Break(())
                }
                _ => ControlFlow::Continue(()),
            }
        }
    }

    expr.visit(&mut AggregateFinder(aggregate_registry)).is_break()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::ast::{
        BinaryOperator, Function, FunctionArg, FunctionArgExpr, Ident, ObjectName,
    };

    struct Names(&'static [&'static str]);

    impl AggregateRegistry for Names {
        fn is_aggregate_function(&self, name: &str) -> bool {
            self.0.iter().any(|n| n.eq_ignore_ascii_case(name))
        }
    }

    const BUILTIN: Names = Names(&["count", "sum", "avg", "min", "max"]);

    fn call(name: &str, arg: &str) -> Expr {
        Expr::Function(Function {
            name: ObjectName(vec![Ident::new(name)]),
            args: vec![FunctionArg::Unnamed(FunctionArgExpr::Expr(
                Expr::Identifier(Ident::new(arg)),
            ))],
            over: None,
            distinct: false,
            order_by: vec![],
            filter: None,
            null_treatment: None,
            special: false,
        })
    }

    fn plus(left: Expr, right: Expr) -> Expr {
        Expr::BinaryOp {
            left: Box::new(left),
            op: BinaryOperator::Plus,
            right: Box::new(right),
        }
    }

    #[test]
    fn test_simple_aggregate_extraction() {
        let registry = BUILTIN;
        let aggregates = extract_aggregates_with_visitor(&call("sum", "a"), &registry);

        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].function_name, "sum");
        assert_eq!(aggregates[0].expr.to_string(), "sum(a)");
    }

    #[test]
    fn test_duplicate_aggregate_detection() {
        let registry = Names(&["sum"]);
        let expr = plus(call("sum", "a"), call("sum", "a"));

        let aggregates = extract_aggregates_with_visitor(&expr, &registry);
        assert_eq!(aggregates.len(), 1);
    }

    #[test]
    fn test_order_follows_traversal() {
        let registry = Names(&["sum", "count"]);
        let expr = plus(call("count", "b"), call("sum", "a"));

        let names: Vec<_> = extract_aggregates_with_visitor(&expr, &registry)
            .into_iter()
            .map(|agg| agg.expr.to_string())
            .collect();
        assert_eq!(names, vec!["count(b)", "sum(a)"]);
    }

    #[test]
    fn test_same_function_different_args() {
        let registry = BUILTIN;
        let expr = plus(call("sum", "a"), call("sum", "b"));

        let aggregates = extract_aggregates_with_visitor(&expr, &registry);
        assert_eq!(aggregates.len(), 2);
        assert_ne!(aggregates[0].expr, aggregates[1].expr);
    }

    #[test]
    fn test_contains_aggregates() {
        let registry = BUILTIN;
        assert!(contains_aggregates_with_visitor(
            &plus(Expr::Identifier(Ident::new("x")), call("max", "a")),
            &registry
        ));
        assert!(!contains_aggregates_with_visitor(
            &call("upper", "a"),
            &registry
        ));
    }

    #[test]
    fn test_registry_is_case_insensitive() {
        let registry = BUILTIN;
        let aggregates = extract_aggregates_with_visitor(&call("SUM", "a"), &registry);
        assert_eq!(aggregates[0].function_name, "SUM");
    }
}
