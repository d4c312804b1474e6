//! Splits a windowed aggregation query into input projection, window
//! aggregate and output projection.

use crate::aggregation::AggregateFunctionRegistry;
use crate::error::PlanError;
use crate::expr::{infer_type, Scope};
use crate::planner::aggregate_validator::validate_aggregate_call;
use crate::planner::logical::{AggregateCall, ProjectionItem};
use crate::planner::window::{resolve_window_call, GroupSpec};
use datatypes::ConcreteDatatype;
use parser::{
    contains_aggregates_with_visitor, is_window_function_name, parse_window_property,
    SelectField, SelectStmt, WindowProperty,
};
use sqlparser::ast::{DataType, Expr, Function, Ident, TimezoneInfo};
use std::collections::BTreeSet;

/// The three pieces a windowed aggregation query is lowered into.
#[derive(Debug, Clone)]
pub struct WindowRewrite {
    /// Time field, grouping columns, then aggregate arguments.
    pub input_projection: Vec<ProjectionItem>,
    /// WHERE predicate evaluated together with the input projection.
    pub condition: Option<Expr>,
    pub aggregate_calls: Vec<AggregateCall>,
    /// Referenced window properties in start, end, rowtime order.
    pub properties: Vec<WindowProperty>,
    /// `None` when the window aggregate output already is the select list.
    pub output_projection: Option<Vec<ProjectionItem>>,
}

/// Rewrite the select list of `select_stmt` against `group`.
pub fn rewrite_window_query(
    select_stmt: &SelectStmt,
    group: &GroupSpec,
    scope: &Scope<'_>,
    registry: &AggregateFunctionRegistry,
) -> Result<WindowRewrite, PlanError> {
    let condition = select_stmt
        .where_condition
        .as_ref()
        .map(|predicate| check_condition(predicate, scope, registry))
        .transpose()?;

    let mut rewriter = WindowClauseRewriter::new(group, scope, registry);
    let mut select_list = Vec::with_capacity(select_stmt.select_fields.len());
    for (idx, field) in select_stmt.select_fields.iter().enumerate() {
        let name = output_name(field, idx, scope)?;
        let expr = match &field.expr {
            Expr::Function(func) => rewriter.rewrite_function(&field.expr, func, Some(&name))?,
            other => rewriter.rewrite_expr(other)?,
        };
        select_list.push(ProjectionItem::new(expr, name));
    }

    let properties: Vec<WindowProperty> = rewriter.properties.iter().copied().collect();
    let mut window_outputs = group.grouping_columns.clone();
    window_outputs.extend(rewriter.aggregates.iter().map(|c| c.output_name.clone()));
    window_outputs.extend(properties.iter().map(|p| group.window.property_name(*p)));

    let select_names: Vec<&String> = select_list.iter().map(|p| &p.name).collect();
    let keeps_natural_order = select_list.iter().all(ProjectionItem::is_bare_reference)
        && select_names.iter().copied().eq(window_outputs.iter());

    tracing::debug!(
        input = ?rewriter.input.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        window_outputs = ?window_outputs,
        output_projection = !keeps_natural_order,
        "rewrote window clause"
    );

    Ok(WindowRewrite {
        input_projection: rewriter.input,
        condition,
        aggregate_calls: rewriter.aggregates,
        properties,
        output_projection: if keeps_natural_order {
            None
        } else {
            Some(select_list)
        },
    })
}

/// Alias if given, the column name for a bare column, `EXPR$i` otherwise.
fn output_name(field: &SelectField, idx: usize, scope: &Scope<'_>) -> Result<String, PlanError> {
    if let Some(alias) = &field.alias {
        return Ok(alias.clone());
    }
    Ok(match scope.resolve_column(&field.expr)? {
        Some(column) => column.name.clone(),
        None => format!("EXPR${}", idx),
    })
}

fn check_condition(
    predicate: &Expr,
    scope: &Scope<'_>,
    registry: &AggregateFunctionRegistry,
) -> Result<Expr, PlanError> {
    if contains_aggregates_with_visitor(predicate, registry) {
        return Err(PlanError::validation(format!(
            "aggregate functions are not allowed in WHERE: {}",
            predicate
        )));
    }
    let datatype = infer_type(predicate, scope)?;
    if datatype != ConcreteDatatype::boolean() {
        return Err(PlanError::validation(format!(
            "WHERE condition must be BOOLEAN, got {}",
            datatype
        )));
    }
    Ok(predicate.clone())
}

fn column_ref(name: &str) -> Expr {
    Expr::Identifier(Ident::new(name))
}

struct WindowClauseRewriter<'a> {
    group: &'a GroupSpec,
    scope: &'a Scope<'a>,
    registry: &'a AggregateFunctionRegistry,
    input: Vec<ProjectionItem>,
    aggregates: Vec<AggregateCall>,
    properties: BTreeSet<WindowProperty>,
}

impl<'a> WindowClauseRewriter<'a> {
    fn new(
        group: &'a GroupSpec,
        scope: &'a Scope<'a>,
        registry: &'a AggregateFunctionRegistry,
    ) -> Self {
        let mut rewriter = Self {
            group,
            scope,
            registry,
            input: Vec::new(),
            aggregates: Vec::new(),
            properties: BTreeSet::new(),
        };
        rewriter.add_input_column(&group.window.time_field);
        for column in &group.grouping_columns {
            rewriter.add_input_column(column);
        }
        rewriter
    }

    fn add_input_column(&mut self, name: &str) {
        if !self.input.iter().any(|item| item.name == name) {
            self.input.push(ProjectionItem::new(column_ref(name), name));
        }
    }

    /// Rewrite a select expression so it only reads window aggregate outputs.
    fn rewrite_expr(&mut self, expr: &Expr) -> Result<Expr, PlanError> {
        let rewritten = match expr {
            Expr::Function(func) => self.rewrite_function(expr, func, None)?,
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
                let column = self.scope.resolve_column(expr)?.ok_or_else(|| {
                    PlanError::validation(format!("column not found: {}", expr))
                })?;
                if !self.group.grouping_columns.contains(&column.name) {
                    return Err(PlanError::validation(format!(
                        "column {} must appear in GROUP BY or be used in an aggregate function",
                        column.name
                    )));
                }
                column_ref(&column.name)
            }
            Expr::Value(_) | Expr::TypedString { .. } => expr.clone(),
            Expr::Nested(inner) => Expr::Nested(Box::new(self.rewrite_expr(inner)?)),
            Expr::UnaryOp { op, expr: operand } => Expr::UnaryOp {
                op: op.clone(),
                expr: Box::new(self.rewrite_expr(operand)?),
            },
            Expr::BinaryOp { left, op, right } => Expr::BinaryOp {
                left: Box::new(self.rewrite_expr(left)?),
                op: op.clone(),
                right: Box::new(self.rewrite_expr(right)?),
            },
            Expr::Cast {
                expr: inner,
                data_type,
                format,
            } => Expr::Cast {
                expr: Box::new(self.rewrite_expr(inner)?),
                data_type: data_type.clone(),
                format: format.clone(),
            },
            Expr::IsNull(inner) => Expr::IsNull(Box::new(self.rewrite_expr(inner)?)),
            Expr::IsNotNull(inner) => Expr::IsNotNull(Box::new(self.rewrite_expr(inner)?)),
            Expr::Between {
                expr: inner,
                negated,
                low,
                high,
            } => Expr::Between {
                expr: Box::new(self.rewrite_expr(inner)?),
                negated: *negated,
                low: Box::new(self.rewrite_expr(low)?),
                high: Box::new(self.rewrite_expr(high)?),
            },
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => Expr::Case {
                operand: match operand {
                    Some(operand) => Some(Box::new(self.rewrite_expr(operand)?)),
                    None => None,
                },
                conditions: conditions
                    .iter()
                    .map(|c| self.rewrite_expr(c))
                    .collect::<Result<_, _>>()?,
                results: results
                    .iter()
                    .map(|r| self.rewrite_expr(r))
                    .collect::<Result<_, _>>()?,
                else_result: match else_result {
                    Some(else_result) => Some(Box::new(self.rewrite_expr(else_result)?)),
                    None => None,
                },
            },
            other => {
                return Err(PlanError::validation(format!(
                    "unsupported expression in select list: {}",
                    other
                )))
            }
        };
        Ok(rewritten)
    }

    /// Window property, aggregate, or error.
    ///
    /// `preferred_name` names the aggregate output when the call is a whole
    /// select item.
    fn rewrite_function(
        &mut self,
        expr: &Expr,
        func: &Function,
        preferred_name: Option<&str>,
    ) -> Result<Expr, PlanError> {
        if let Some(call) = parse_window_property(expr)? {
            let window = &self.group.window;
            let (time_field, spec) = resolve_window_call(&call.window, self.scope)?;
            if time_field != window.time_field || spec != window.spec {
                return Err(PlanError::validation(format!(
                    "{} does not match the GROUP BY window {}",
                    expr, window
                )));
            }
            self.properties.insert(call.property);
            return Ok(Expr::Cast {
                expr: Box::new(column_ref(&window.property_name(call.property))),
                data_type: DataType::Timestamp(Some(3), TimezoneInfo::None),
                format: None,
            });
        }
        if is_window_function_name(&func.name.to_string()) {
            return Err(PlanError::validation(format!(
                "window function {} is only allowed in GROUP BY",
                func.name
            )));
        }
        if self.registry.is_registered(&func.name.to_string()) {
            return self.rewrite_aggregate(func, preferred_name);
        }
        Err(PlanError::validation(format!(
            "unknown function: {}",
            func.name
        )))
    }

    fn rewrite_aggregate(
        &mut self,
        func: &Function,
        preferred_name: Option<&str>,
    ) -> Result<Expr, PlanError> {
        let validated = validate_aggregate_call(func, self.scope, self.registry)?;
        let args = validated
            .args
            .iter()
            .map(|arg| self.project_argument(arg))
            .collect::<Result<Vec<_>, _>>()?;
        let function_name = validated.function.name().to_string();

        if let Some(existing) = self.aggregates.iter().find(|call| {
            call.function_name == function_name
                && call.distinct == validated.distinct
                && call.args == args
        }) {
            return Ok(column_ref(&existing.output_name));
        }

        let position = self.group.grouping_columns.len() + self.aggregates.len();
        let output_name = match preferred_name {
            Some(name) if !self.is_window_output(name) => name.to_string(),
            _ => format!("$f{}", position),
        };
        self.aggregates.push(AggregateCall {
            function_name,
            distinct: validated.distinct,
            args,
            output_name: output_name.clone(),
            return_type: validated.return_type,
        });
        Ok(column_ref(&output_name))
    }

    /// Input column holding an aggregate argument; computed arguments get
    /// `$f{position}`.
    fn project_argument(&mut self, arg: &Expr) -> Result<String, PlanError> {
        if let Some(column) = self.scope.resolve_column(arg)? {
            self.add_input_column(&column.name);
            return Ok(column.name.clone());
        }
        if let Some(item) = self
            .input
            .iter()
            .find(|item| !item.is_bare_reference() && item.expr == *arg)
        {
            return Ok(item.name.clone());
        }
        let name = format!("$f{}", self.input.len());
        self.input.push(ProjectionItem::new(arg.clone(), name.clone()));
        Ok(name)
    }

    /// Column names compare case-insensitively, so reserved names do too.
    fn is_window_output(&self, name: &str) -> bool {
        self.group
            .grouping_columns
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name))
            || self
                .aggregates
                .iter()
                .any(|c| c.output_name.eq_ignore_ascii_case(name))
            || WindowProperty::ALL
                .iter()
                .any(|p| self.group.window.property_name(*p).eq_ignore_ascii_case(name))
    }
}
