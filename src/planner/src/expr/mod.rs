//! Name resolution and static typing of SQL expressions against a schema.

use crate::error::PlanError;
use datatypes::{ColumnSchema, ConcreteDatatype, Schema};
use sqlparser::ast::{BinaryOperator, Expr, UnaryOperator, Value};

/// Resolves column references of one relation.
///
/// Qualified references (`t.a`) must use the table name or its alias.
pub struct Scope<'a> {
    schema: &'a Schema,
    qualifiers: Vec<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, qualifier: &'a str) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// `Ok(None)` when `expr` is not a column reference at all.
    pub fn resolve_column(&self, expr: &Expr) -> Result<Option<&'a ColumnSchema>, PlanError> {
        let name = match expr {
            Expr::Identifier(ident) => ident.value.as_str(),
            Expr::CompoundIdentifier(parts) => match parts.as_slice() {
                [qualifier, column] => {
                    if !self
                        .qualifiers
                        .iter()
                        .any(|q| q.eq_ignore_ascii_case(&qualifier.value))
                    {
                        return Err(PlanError::validation(format!(
                            "unknown table qualifier '{}' in {}",
                            qualifier.value, expr
                        )));
                    }
                    column.value.as_str()
                }
                _ => {
                    return Err(PlanError::validation(format!(
                        "unsupported column reference: {}",
                        expr
                    )))
                }
            },
            _ => return Ok(None),
        };
        self.schema
            .column_schema_by_name(name)
            .map(Some)
            .ok_or_else(|| PlanError::validation(format!("column not found: {}", name)))
    }
}

/// Infer the static type of a scalar expression.
///
/// Function calls are not scalar expressions here; callers handle aggregates
/// and window functions before reaching this point.
pub fn infer_type(expr: &Expr, scope: &Scope<'_>) -> Result<ConcreteDatatype, PlanError> {
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => scope
            .resolve_column(expr)?
            .map(|column| column.data_type.clone())
            .ok_or_else(|| PlanError::validation(format!("column not found: {}", expr))),
        Expr::Value(value) => literal_type(value),
        Expr::TypedString { data_type, .. } => sql_type(&data_type.to_string()),
        Expr::Nested(inner) => infer_type(inner, scope),
        Expr::UnaryOp { op, expr: operand } => {
            let operand_type = infer_type(operand, scope)?;
            match op {
                UnaryOperator::Not => expect_boolean(&operand_type, expr).map(|_| operand_type),
                UnaryOperator::Minus | UnaryOperator::Plus if operand_type.is_numeric() => {
                    Ok(operand_type)
                }
                _ => Err(PlanError::validation(format!(
                    "operator {} cannot be applied to {}",
                    op, operand_type
                ))),
            }
        }
        Expr::BinaryOp { left, op, right } => {
            let left_type = infer_type(left, scope)?;
            let right_type = infer_type(right, scope)?;
            binary_type(op, &left_type, &right_type, expr)
        }
        Expr::Cast {
            expr: inner,
            data_type,
            ..
        } => {
            if !matches!(inner.as_ref(), Expr::Value(Value::Null)) {
                infer_type(inner, scope)?;
            }
            sql_type(&data_type.to_string())
        }
        Expr::IsNull(inner)
        | Expr::IsNotNull(inner)
        | Expr::IsTrue(inner)
        | Expr::IsFalse(inner) => {
            infer_type(inner, scope)?;
            Ok(ConcreteDatatype::boolean())
        }
        Expr::Between {
            expr: inner,
            low,
            high,
            ..
        } => {
            for operand in [inner, low, high] {
                infer_type(operand, scope)?;
            }
            Ok(ConcreteDatatype::boolean())
        }
        Expr::InList {
            expr: inner, list, ..
        } => {
            infer_type(inner, scope)?;
            for item in list {
                infer_type(item, scope)?;
            }
            Ok(ConcreteDatatype::boolean())
        }
        Expr::Like {
            expr: inner,
            pattern,
            ..
        } => {
            infer_type(inner, scope)?;
            infer_type(pattern, scope)?;
            Ok(ConcreteDatatype::boolean())
        }
        Expr::Case {
            operand,
            conditions,
            results,
            else_result,
        } => {
            if let Some(operand) = operand {
                infer_type(operand, scope)?;
            }
            for condition in conditions {
                let condition_type = infer_type(condition, scope)?;
                if operand.is_none() {
                    expect_boolean(&condition_type, condition)?;
                }
            }
            let mut result_type: Option<ConcreteDatatype> = None;
            for result in results.iter().chain(else_result.as_deref()) {
                let branch_type = infer_type(result, scope)?;
                result_type = Some(match result_type {
                    None => branch_type,
                    Some(prev) if prev == branch_type => prev,
                    Some(prev) => ConcreteDatatype::common_numeric_type(&prev, &branch_type)
                        .ok_or_else(|| {
                            PlanError::validation(format!(
                                "CASE branches mix {} and {} in {}",
                                prev, branch_type, expr
                            ))
                        })?,
                });
            }
            result_type
                .ok_or_else(|| PlanError::validation(format!("CASE without results: {}", expr)))
        }
        Expr::Function(func) => Err(PlanError::validation(format!(
            "unknown function: {}",
            func.name
        ))),
        other => Err(PlanError::validation(format!(
            "unsupported expression: {}",
            other
        ))),
    }
}

fn literal_type(value: &Value) -> Result<ConcreteDatatype, PlanError> {
    match value {
        Value::Number(raw, _) => {
            if raw.contains(['.', 'e', 'E']) {
                Ok(ConcreteDatatype::float64())
            } else if raw.parse::<i32>().is_ok() {
                Ok(ConcreteDatatype::int32())
            } else {
                Ok(ConcreteDatatype::int64())
            }
        }
        Value::SingleQuotedString(_) | Value::DoubleQuotedString(_) => {
            Ok(ConcreteDatatype::string())
        }
        Value::Boolean(_) => Ok(ConcreteDatatype::boolean()),
        Value::Null => Err(PlanError::validation(
            "NULL literal needs an explicit CAST",
        )),
        other => Err(PlanError::validation(format!(
            "unsupported literal: {}",
            other
        ))),
    }
}

fn sql_type(name: &str) -> Result<ConcreteDatatype, PlanError> {
    ConcreteDatatype::from_sql_name(name)
        .ok_or_else(|| PlanError::validation(format!("unsupported data type: {}", name)))
}

fn expect_boolean(datatype: &ConcreteDatatype, expr: &Expr) -> Result<(), PlanError> {
    if datatype == &ConcreteDatatype::boolean() {
        Ok(())
    } else {
        Err(PlanError::validation(format!(
            "expected BOOLEAN in {}, got {}",
            expr, datatype
        )))
    }
}

fn binary_type(
    op: &BinaryOperator,
    left: &ConcreteDatatype,
    right: &ConcreteDatatype,
    expr: &Expr,
) -> Result<ConcreteDatatype, PlanError> {
    match op {
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo => ConcreteDatatype::common_numeric_type(left, right)
            .ok_or_else(|| {
                PlanError::validation(format!(
                    "operator {} requires numeric operands, got {} and {}",
                    op, left, right
                ))
            }),
        BinaryOperator::Eq
        | BinaryOperator::NotEq
        | BinaryOperator::Lt
        | BinaryOperator::LtEq
        | BinaryOperator::Gt
        | BinaryOperator::GtEq => {
            let comparable = left == right
                || ConcreteDatatype::common_numeric_type(left, right).is_some();
            if comparable {
                Ok(ConcreteDatatype::boolean())
            } else {
                Err(PlanError::validation(format!(
                    "cannot compare {} with {} in {}",
                    left, right, expr
                )))
            }
        }
        BinaryOperator::And | BinaryOperator::Or => {
            expect_boolean(left, expr)?;
            expect_boolean(right, expr)?;
            Ok(ConcreteDatatype::boolean())
        }
        BinaryOperator::StringConcat => Ok(ConcreteDatatype::string()),
        other => Err(PlanError::validation(format!(
            "unsupported operator: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanErrorKind;
    use parser::parse_sql;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnSchema::new("T".to_string(), "a".to_string(), ConcreteDatatype::int32()),
            ColumnSchema::new("T".to_string(), "b".to_string(), ConcreteDatatype::int64()),
            ColumnSchema::new("T".to_string(), "c".to_string(), ConcreteDatatype::string()),
            ColumnSchema::new(
                "T".to_string(),
                "ts".to_string(),
                ConcreteDatatype::timestamp(),
            ),
        ])
    }

    fn select_expr(sql: &str) -> Expr {
        parse_sql(sql).unwrap().select_fields.remove(0).expr
    }

    #[test]
    fn infer_column_and_arithmetic_types() {
        let schema = schema();
        let scope = Scope::new(&schema).with_qualifier("T");
        let cases = [
            ("SELECT a FROM T", ConcreteDatatype::int32()),
            ("SELECT T.b FROM T", ConcreteDatatype::int64()),
            ("SELECT a + b FROM T", ConcreteDatatype::int64()),
            ("SELECT a * 1.5 FROM T", ConcreteDatatype::float64()),
            ("SELECT -(a) FROM T", ConcreteDatatype::int32()),
            ("SELECT a > 1 AND c = 'x' FROM T", ConcreteDatatype::boolean()),
            ("SELECT CAST(ts AS TIMESTAMP(3)) FROM T", ConcreteDatatype::timestamp()),
            ("SELECT CAST(NULL AS DOUBLE) FROM T", ConcreteDatatype::float64()),
            ("SELECT 3000000000 FROM T", ConcreteDatatype::int64()),
            (
                "SELECT CASE WHEN a > 1 THEN b ELSE 0 END FROM T",
                ConcreteDatatype::int64(),
            ),
        ];
        for (sql, expected) in cases {
            assert_eq!(infer_type(&select_expr(sql), &scope).unwrap(), expected, "sql={sql}");
        }
    }

    #[test]
    fn infer_rejects_bad_expressions() {
        let schema = schema();
        let scope = Scope::new(&schema).with_qualifier("T");
        let cases = [
            ("SELECT missing FROM T", "column not found: missing"),
            ("SELECT u.a FROM T", "unknown table qualifier 'u'"),
            ("SELECT a + c FROM T", "requires numeric operands"),
            ("SELECT upper(c) FROM T", "unknown function: upper"),
            ("SELECT a AND b FROM T", "expected BOOLEAN"),
            ("SELECT CASE WHEN a > 1 THEN c ELSE 0 END FROM T", "CASE branches mix"),
        ];
        for (sql, needle) in cases {
            let err = infer_type(&select_expr(sql), &scope).unwrap_err();
            assert_eq!(err.kind(), PlanErrorKind::Validation, "sql={sql}");
            assert!(err.to_string().contains(needle), "sql={sql} err={err}");
        }
    }

    #[test]
    fn resolve_column_is_case_insensitive() {
        let schema = schema();
        let scope = Scope::new(&schema);
        let column = scope.resolve_column(&select_expr("SELECT TS FROM T")).unwrap();
        assert_eq!(column.map(|c| c.name.as_str()), Some("ts"));
        assert!(scope
            .resolve_column(&select_expr("SELECT 1 FROM T"))
            .unwrap()
            .is_none());
    }
}
