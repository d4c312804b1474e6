pub mod aggregate_validator;
pub mod explain;
pub mod interval;
pub mod logical;
pub mod rewriter;
pub mod window;

use crate::aggregation::AggregateFunctionRegistry;
use crate::catalog::Catalog;
use crate::error::PlanError;
use logical::{create_logical_plan, LogicalPlan};

/// Parse `sql` and build its logical plan.
pub fn plan_sql(
    sql: &str,
    catalog: &Catalog,
    registry: &AggregateFunctionRegistry,
) -> Result<LogicalPlan, PlanError> {
    let select_stmt = parser::parse_sql(sql)?;
    create_logical_plan(select_stmt, catalog, registry)
}
