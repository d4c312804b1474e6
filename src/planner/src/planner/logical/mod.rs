use crate::aggregation::AggregateFunctionRegistry;
use crate::catalog::Catalog;
use crate::error::PlanError;
use crate::expr::{infer_type, Scope};
use crate::planner::rewriter::rewrite_window_query;
use crate::planner::window::build_group_spec;
use datatypes::{ColumnSchema, ConcreteDatatype, Schema};
use parser::{ColPlaceholderAllocator, SelectStmt};
use std::sync::Arc;

pub mod calc;
pub mod scan;
pub mod window_aggregate;

pub use calc::{Calc, ProjectionItem};
pub use scan::Scan;
pub use window_aggregate::{AggregateCall, WindowAggregate};

#[derive(Debug, Clone)]
pub struct BaseLogicalPlan {
    pub index: i64,
    pub input: Option<Box<LogicalPlan>>,
}

impl BaseLogicalPlan {
    pub fn new(input: Option<LogicalPlan>, index: i64) -> Self {
        Self {
            index,
            input: input.map(Box::new),
        }
    }

    pub fn input(&self) -> Option<&LogicalPlan> {
        self.input.as_deref()
    }

    pub fn index(&self) -> i64 {
        self.index
    }
}

#[derive(Debug, Clone)]
pub enum LogicalPlan {
    Scan(Scan),
    Calc(Calc),
    WindowAggregate(WindowAggregate),
}

impl LogicalPlan {
    fn base(&self) -> &BaseLogicalPlan {
        match self {
            LogicalPlan::Scan(plan) => &plan.base,
            LogicalPlan::Calc(plan) => &plan.base,
            LogicalPlan::WindowAggregate(plan) => &plan.base,
        }
    }

    pub fn input(&self) -> Option<&LogicalPlan> {
        self.base().input()
    }

    pub fn get_plan_type(&self) -> &str {
        match self {
            LogicalPlan::Scan(_) => "Scan",
            LogicalPlan::Calc(_) => "Calc",
            LogicalPlan::WindowAggregate(_) => "WindowAggregate",
        }
    }

    pub fn get_plan_index(&self) -> i64 {
        self.base().index()
    }

    /// Get the plan name in format: {{plan_type}}_{{plan_index}}
    pub fn get_plan_name(&self) -> String {
        format!("{}_{}", self.get_plan_type(), self.get_plan_index())
    }

    pub fn schema(&self) -> Arc<Schema> {
        match self {
            LogicalPlan::Scan(plan) => Arc::clone(&plan.schema),
            LogicalPlan::Calc(plan) => Arc::clone(&plan.schema),
            LogicalPlan::WindowAggregate(plan) => Arc::clone(&plan.schema),
        }
    }

    /// The window aggregate of this plan, searching down the input chain.
    pub fn window_aggregate(&self) -> Option<&WindowAggregate> {
        match self {
            LogicalPlan::WindowAggregate(plan) => Some(plan),
            other => other.input().and_then(LogicalPlan::window_aggregate),
        }
    }
}

/// Create a LogicalPlan from a SelectStmt
///
/// The plan structure will be:
/// - Scan (the single FROM table)
/// - Calc (input projection and WHERE), omitted when it would forward the scan unchanged
/// - WindowAggregate (grouping columns, window, aggregates, window properties)
/// - Calc (output projection), omitted when the select list is the window aggregate output
///
/// Returns the root LogicalPlan node
pub fn create_logical_plan(
    select_stmt: SelectStmt,
    catalog: &Catalog,
    registry: &AggregateFunctionRegistry,
) -> Result<LogicalPlan, PlanError> {
    if select_stmt.having.is_some() {
        return Err(PlanError::validation(
            "HAVING is not supported with group windows",
        ));
    }

    let source = &select_stmt.source;
    let table = catalog
        .get(&source.name)
        .ok_or_else(|| PlanError::validation(format!("table not found: {}", source.name)))?;
    let table_schema = table.schema();
    let mut scope = Scope::new(&table_schema).with_qualifier(table.name());
    if let Some(alias) = &source.alias {
        scope = scope.with_qualifier(alias);
    }

    let mut aliases = ColPlaceholderAllocator::new("w$");
    let group = build_group_spec(&select_stmt.group_by_exprs, &scope, &mut aliases)?;
    let rewrite = rewrite_window_query(&select_stmt, &group, &scope, registry)?;

    let mut current_index = 0i64;
    let mut current_plan = LogicalPlan::Scan(Scan::new(
        table.name().to_string(),
        source.alias.clone(),
        Arc::clone(&table_schema),
        current_index,
    ));
    current_index += 1;

    let forwards_scan = rewrite.condition.is_none()
        && rewrite.input_projection.iter().all(ProjectionItem::is_bare_reference)
        && rewrite
            .input_projection
            .iter()
            .map(|item| &item.name)
            .eq(table_schema.column_schemas().iter().map(|c| &c.name));
    if !forwards_scan {
        let schema = projection_schema(&rewrite.input_projection, &scope, "Calc")?;
        let calc = Calc::new(
            rewrite.input_projection,
            rewrite.condition,
            Arc::new(schema),
            current_plan,
            current_index,
        );
        current_plan = LogicalPlan::Calc(calc);
        current_index += 1;
    }

    let mut columns = Vec::new();
    for name in &group.grouping_columns {
        let column = table_schema
            .column_schema_by_name(name)
            .ok_or_else(|| PlanError::validation(format!("column not found: {}", name)))?;
        columns.push(ColumnSchema::new(
            group.window.alias.clone(),
            name.clone(),
            column.data_type.clone(),
        ));
    }
    for call in &rewrite.aggregate_calls {
        columns.push(ColumnSchema::new(
            group.window.alias.clone(),
            call.output_name.clone(),
            call.return_type.clone(),
        ));
    }
    for property in &rewrite.properties {
        columns.push(ColumnSchema::new(
            group.window.alias.clone(),
            group.window.property_name(*property),
            ConcreteDatatype::timestamp(),
        ));
    }
    let window_schema = Schema::new(columns);
    let output_schema = match &rewrite.output_projection {
        Some(items) => Some(projection_schema(items, &Scope::new(&window_schema), "Calc")?),
        None => None,
    };

    current_plan = LogicalPlan::WindowAggregate(WindowAggregate::new(
        group.grouping_columns,
        group.window,
        rewrite.aggregate_calls,
        rewrite.properties,
        Arc::new(window_schema),
        current_plan,
        current_index,
    ));
    current_index += 1;

    if let (Some(items), Some(schema)) = (rewrite.output_projection, output_schema) {
        current_plan = LogicalPlan::Calc(Calc::new(
            items,
            None,
            Arc::new(schema),
            current_plan,
            current_index,
        ));
    }

    tracing::info!(
        table = %table.name(),
        root = %current_plan.get_plan_name(),
        "created logical plan"
    );
    Ok(current_plan)
}

fn projection_schema(
    items: &[ProjectionItem],
    scope: &Scope<'_>,
    source_name: &str,
) -> Result<Schema, PlanError> {
    let columns = items
        .iter()
        .map(|item| {
            infer_type(&item.expr, scope).map(|datatype| {
                ColumnSchema::new(source_name.to_string(), item.name.clone(), datatype)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Schema::new(columns))
}
