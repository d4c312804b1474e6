//! Static checks of aggregate calls against registered signatures.

use crate::aggregation::{AggregateFunction, AggregateFunctionRegistry};
use crate::error::PlanError;
use crate::expr::{infer_type, Scope};
use datatypes::ConcreteDatatype;
use parser::extract_aggregates_with_visitor;
use sqlparser::ast::{Expr, Function, FunctionArg, FunctionArgExpr};
use std::sync::Arc;

/// An aggregate call whose arguments and result type have been checked.
pub struct ValidatedAggregate {
    pub function: Arc<dyn AggregateFunction>,
    pub distinct: bool,
    /// Argument expressions as written; empty for `COUNT(*)`.
    pub args: Vec<Expr>,
    pub return_type: ConcreteDatatype,
}

/// Resolve `func` in the registry and check its arguments against the
/// declared signature. Argument types come from the scan schema.
pub fn validate_aggregate_call(
    func: &Function,
    scope: &Scope<'_>,
    registry: &AggregateFunctionRegistry,
) -> Result<ValidatedAggregate, PlanError> {
    let name = func.name.to_string();
    let function = registry
        .lookup(&name)
        .ok_or_else(|| PlanError::validation(format!("unknown aggregate function: {}", name)))?;

    if func.over.is_some() {
        return Err(PlanError::validation(format!(
            "OVER is not supported in windowed aggregation: {}",
            func
        )));
    }
    if func.filter.is_some() {
        return Err(PlanError::validation(format!(
            "FILTER is not supported in windowed aggregation: {}",
            func
        )));
    }
    if !func.order_by.is_empty() {
        return Err(PlanError::validation(format!(
            "ORDER BY inside an aggregate is not supported: {}",
            func
        )));
    }

    let mut args = Vec::with_capacity(func.args.len());
    for arg in &func.args {
        match arg {
            FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => {
                if let Some(inner) = extract_aggregates_with_visitor(expr, registry).first() {
                    return Err(PlanError::validation(format!(
                        "nested aggregate call {} is not allowed in {}",
                        inner.expr, func
                    )));
                }
                args.push(expr.clone());
            }
            FunctionArg::Unnamed(FunctionArgExpr::Wildcard)
            | FunctionArg::Unnamed(FunctionArgExpr::QualifiedWildcard(_)) => {
                if !function.accepts_wildcard() || func.args.len() != 1 || func.distinct {
                    return Err(PlanError::validation(format!(
                        "{} does not accept * as an argument",
                        func
                    )));
                }
            }
            FunctionArg::Named { .. } => {
                return Err(PlanError::validation(format!(
                    "named arguments are not supported: {}",
                    func
                )))
            }
        }
    }

    let arg_types = args
        .iter()
        .map(|expr| infer_type(expr, scope))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = function
        .return_type(&arg_types)
        .map_err(|msg| PlanError::validation(format!("invalid call {}: {}", func, msg)))?;

    Ok(ValidatedAggregate {
        function,
        distinct: func.distinct,
        args,
        return_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{TypeSpec, UserDefinedAggregate};
    use crate::error::PlanErrorKind;
    use datatypes::{ColumnSchema, Schema};
    use parser::parse_sql;

    fn schema() -> Schema {
        let column =
            |name: &str, datatype| ColumnSchema::new("T".to_string(), name.to_string(), datatype);
        Schema::new(vec![
            column("a", ConcreteDatatype::int64()),
            column("b", ConcreteDatatype::int32()),
            column("c", ConcreteDatatype::string()),
            column("ts", ConcreteDatatype::timestamp()),
        ])
    }

    fn registry() -> Arc<AggregateFunctionRegistry> {
        let registry = AggregateFunctionRegistry::with_builtins();
        registry.register_function(Arc::new(UserDefinedAggregate::new(
            "weightedAvg",
            vec![
                TypeSpec::Exact(ConcreteDatatype::int64()),
                TypeSpec::Exact(ConcreteDatatype::int64()),
            ],
            ConcreteDatatype::int64(),
        )));
        registry
    }

    fn validate(select_item: &str) -> Result<ValidatedAggregate, PlanError> {
        let stmt = parse_sql(&format!("SELECT {} FROM T", select_item)).unwrap();
        let Expr::Function(func) = &stmt.select_fields[0].expr else {
            panic!("expected a function call");
        };
        let schema = schema();
        validate_aggregate_call(func, &Scope::new(&schema), &registry())
    }

    #[test]
    fn builtin_return_types() {
        let cases = [
            ("SUM(a)", ConcreteDatatype::int64()),
            ("SUM(b * 2)", ConcreteDatatype::int32()),
            ("AVG(b)", ConcreteDatatype::int32()),
            ("COUNT(c)", ConcreteDatatype::int64()),
            ("COUNT(*)", ConcreteDatatype::int64()),
            ("MAX(ts)", ConcreteDatatype::timestamp()),
            ("min(c)", ConcreteDatatype::string()),
        ];
        for (item, expected) in cases {
            assert_eq!(validate(item).unwrap().return_type, expected, "item={item}");
        }
    }

    #[test]
    fn count_star_has_no_arguments() {
        let validated = validate("COUNT(*)").unwrap();
        assert!(validated.args.is_empty());
        assert_eq!(validated.function.name(), "COUNT");

        let validated = validate("COUNT(DISTINCT c)").unwrap();
        assert!(validated.distinct);
        assert_eq!(validated.args.len(), 1);
    }

    #[test]
    fn udaf_widens_numeric_arguments() {
        let validated = validate("weightedAvg(a, b)").unwrap();
        assert_eq!(validated.function.name(), "weightedAvg");
        assert_eq!(validated.return_type, ConcreteDatatype::int64());
    }

    #[test]
    fn rejects_invalid_calls() {
        let cases = [
            (
                "weightedAvg(a, c)",
                "invalid call weightedAvg(a, c): argument 2 expects BIGINT, got VARCHAR",
            ),
            ("weightedAvg(a)", "expects 2 argument(s), got 1"),
            ("SUM(c)", "argument 1 expects NUMERIC, got VARCHAR"),
            ("SUM(*)", "does not accept *"),
            (
                "SUM(COUNT(a))",
                "nested aggregate call COUNT(a) is not allowed in SUM(COUNT(a))",
            ),
            (
                "MAX(a + AVG(b) * 2)",
                "nested aggregate call AVG(b) is not allowed",
            ),
            ("SUM(missing)", "column not found: missing"),
        ];
        for (item, needle) in cases {
            let err = validate(item).err().unwrap();
            assert_eq!(err.kind(), PlanErrorKind::Validation, "item={item}");
            assert!(err.to_string().contains(needle), "item={item} err={err}");
        }
    }
}
