use sqlparser::ast::Expr;

/// A single `SELECT ... FROM <table> [WHERE ...] [GROUP BY ...]` query block.
#[derive(Debug, Clone)]
pub struct SelectStmt {
    /// The select fields/expressions, in user order
    pub select_fields: Vec<SelectField>,
    /// The single table the query reads from
    pub source: SourceInfo,
    /// Optional WHERE predicate
    pub where_condition: Option<Expr>,
    /// GROUP BY items as written, window function included
    pub group_by_exprs: Vec<Expr>,
    /// Optional HAVING predicate
    pub having: Option<Expr>,
}

/// Represents a single select field/expression
#[derive(Debug, Clone)]
pub struct SelectField {
    /// The expression for this field (from sqlparser AST)
    pub expr: Expr,
    /// Optional alias for this field
    pub alias: Option<String>,
}

/// Table referenced in the FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub alias: Option<String>,
}

impl SelectStmt {
    pub fn new(select_fields: Vec<SelectField>, source: SourceInfo) -> Self {
        Self {
            select_fields,
            source,
            where_condition: None,
            group_by_exprs: Vec::new(),
            having: None,
        }
    }
}

impl SelectField {
    /// Create a new SelectField
    pub fn new(expr: Expr, alias: Option<String>) -> Self {
        Self { expr, alias }
    }
}

impl SourceInfo {
    pub fn new(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }
}
