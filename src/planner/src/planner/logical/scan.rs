use crate::planner::logical::BaseLogicalPlan;
use datatypes::Schema;
use std::sync::Arc;

/// Leaf node reading every column of a catalog table.
#[derive(Debug, Clone)]
pub struct Scan {
    pub base: BaseLogicalPlan,
    pub table_name: String,
    pub alias: Option<String>,
    pub schema: Arc<Schema>,
}

impl Scan {
    pub fn new(table_name: String, alias: Option<String>, schema: Arc<Schema>, index: i64) -> Self {
        Self {
            base: BaseLogicalPlan::new(None, index),
            table_name,
            alias,
            schema,
        }
    }
}
