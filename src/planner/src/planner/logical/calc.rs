use crate::planner::logical::{BaseLogicalPlan, LogicalPlan};
use datatypes::Schema;
use sqlparser::ast::Expr;
use std::fmt;
use std::sync::Arc;

/// One named output of a [`Calc`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionItem {
    pub expr: Expr,
    pub name: String,
}

impl ProjectionItem {
    pub fn new(expr: Expr, name: impl Into<String>) -> Self {
        Self {
            expr,
            name: name.into(),
        }
    }

    /// A plain reference to an input column of the same name.
    pub fn is_bare_reference(&self) -> bool {
        matches!(&self.expr, Expr::Identifier(ident) if ident.value == self.name)
    }
}

impl fmt::Display for ProjectionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bare_reference() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} AS {}", self.expr, self.name)
        }
    }
}

/// Projection with an optional filter condition.
#[derive(Debug, Clone)]
pub struct Calc {
    pub base: BaseLogicalPlan,
    pub projections: Vec<ProjectionItem>,
    pub condition: Option<Expr>,
    pub schema: Arc<Schema>,
}

impl Calc {
    pub fn new(
        projections: Vec<ProjectionItem>,
        condition: Option<Expr>,
        schema: Arc<Schema>,
        input: LogicalPlan,
        index: i64,
    ) -> Self {
        Self {
            base: BaseLogicalPlan::new(Some(input), index),
            projections,
            condition,
            schema,
        }
    }
}
