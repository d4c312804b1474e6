use crate::planner::logical::{BaseLogicalPlan, LogicalPlan};
use crate::planner::window::WindowDescriptor;
use datatypes::{ConcreteDatatype, Schema};
use parser::WindowProperty;
use std::fmt;
use std::sync::Arc;

/// Aggregate evaluated per group and window.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    /// Registered function name, e.g. `SUM` or `weightedAvg`.
    pub function_name: String,
    pub distinct: bool,
    /// Input columns; empty for `COUNT(*)`.
    pub args: Vec<String>,
    pub output_name: String,
    pub return_type: ConcreteDatatype,
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = if self.args.is_empty() {
            "*".to_string()
        } else {
            self.args.join(", ")
        };
        let distinct = if self.distinct { "DISTINCT " } else { "" };
        write!(f, "{}({}{})", self.function_name, distinct, args)
    }
}

/// Grouped aggregation over a group window.
///
/// Output columns: grouping columns, aggregate outputs, then the requested
/// window properties in start, end, rowtime order.
#[derive(Debug, Clone)]
pub struct WindowAggregate {
    pub base: BaseLogicalPlan,
    pub grouping_columns: Vec<String>,
    pub window: WindowDescriptor,
    pub aggregate_calls: Vec<AggregateCall>,
    pub properties: Vec<WindowProperty>,
    pub schema: Arc<Schema>,
}

impl WindowAggregate {
    pub fn new(
        grouping_columns: Vec<String>,
        window: WindowDescriptor,
        aggregate_calls: Vec<AggregateCall>,
        properties: Vec<WindowProperty>,
        schema: Arc<Schema>,
        input: LogicalPlan,
        index: i64,
    ) -> Self {
        Self {
            base: BaseLogicalPlan::new(Some(input), index),
            grouping_columns,
            window,
            aggregate_calls,
            properties,
            schema,
        }
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties
            .iter()
            .map(|p| self.window.property_name(*p))
            .collect()
    }
}
