pub mod aggregation;
pub mod catalog;
pub mod error;
pub mod expr;
pub mod planner;

pub use aggregation::{
    AggregateFunction, AggregateFunctionRegistry, TypeSpec, UserDefinedAggregate,
};
pub use catalog::{Catalog, CatalogError, TableDefinition};
pub use datatypes::{ColumnSchema, ConcreteDatatype, Schema};
pub use error::{PlanError, PlanErrorKind};
pub use planner::explain::{ExplainNode, ExplainReport, ExplainRow};
pub use planner::logical::{create_logical_plan, LogicalPlan};
pub use planner::plan_sql;
pub use planner::window::{GroupSpec, WindowDescriptor, WindowSpec};
