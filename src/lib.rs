pub mod bootstrap;
pub mod config;
pub mod logging;

use config::ExplainFormat;
use planner::{plan_sql, AggregateFunctionRegistry, Catalog, ExplainReport, PlanError};

/// Plan `sql` and render its explain report in `format`.
pub fn explain_sql(
    sql: &str,
    catalog: &Catalog,
    registry: &AggregateFunctionRegistry,
    format: ExplainFormat,
) -> Result<String, PlanError> {
    let plan = plan_sql(sql, catalog, registry)?;
    let report = ExplainReport::from_logical(&plan);
    Ok(match format {
        ExplainFormat::Topology => report.topology_string(),
        ExplainFormat::Table => report.table_string(),
        ExplainFormat::Json => report.to_json().to_string(),
    })
}
