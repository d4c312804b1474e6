use sqlparser::ast::{
    GroupByExpr, Query, Select, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins,
};
use sqlparser::parser::Parser;

use crate::dialect::BatchDialect;
use crate::error::ParseError;
use crate::select_stmt::{SelectField, SelectStmt, SourceInfo};

/// SQL Parser based on BatchDialect
pub struct BatchSqlParser {
    dialect: BatchDialect,
}

impl BatchSqlParser {
    /// Create a new BatchSqlParser
    pub fn new() -> Self {
        Self {
            dialect: BatchDialect::new(),
        }
    }

    /// Parse SQL text into a [`SelectStmt`].
    ///
    /// Only a single plain SELECT over one table is accepted. Window functions
    /// stay untouched inside `group_by_exprs`.
    pub fn parse(&self, sql: &str) -> Result<SelectStmt, ParseError> {
        let statements = Parser::parse_sql(&self.dialect, sql)?;

        if statements.len() != 1 {
            return Err(ParseError::Unsupported(format!(
                "expected exactly one SQL statement, got {}",
                statements.len()
            )));
        }

        match &statements[0] {
            Statement::Query(query) => self.extract_from_query(query),
            other => Err(ParseError::Unsupported(format!(
                "expected a SELECT query, got: {}",
                other
            ))),
        }
    }

    fn extract_from_query(&self, query: &Query) -> Result<SelectStmt, ParseError> {
        if query.with.is_some() {
            return Err(ParseError::Unsupported("WITH clause".to_string()));
        }
        if !query.order_by.is_empty() {
            return Err(ParseError::Unsupported("ORDER BY".to_string()));
        }
        if query.limit.is_some() || query.offset.is_some() || query.fetch.is_some() {
            return Err(ParseError::Unsupported("LIMIT/OFFSET/FETCH".to_string()));
        }

        match &*query.body {
            SetExpr::Select(select) => self.extract_from_select(select),
            _ => Err(ParseError::Unsupported(
                "expected a simple SELECT query".to_string(),
            )),
        }
    }

    fn extract_from_select(&self, select: &Select) -> Result<SelectStmt, ParseError> {
        if select.distinct.is_some() {
            return Err(ParseError::Unsupported("SELECT DISTINCT".to_string()));
        }

        let source = self.extract_source(&select.from)?;

        let mut select_fields = Vec::with_capacity(select.projection.len());
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => {
                    select_fields.push(SelectField::new(expr.clone(), None));
                }
                SelectItem::ExprWithAlias { expr, alias } => {
                    select_fields.push(SelectField::new(expr.clone(), Some(alias.value.clone())));
                }
                SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(_, _) => {
                    return Err(ParseError::Unsupported(
                        "wildcard (*) in select fields".to_string(),
                    ));
                }
            }
        }

        let group_by_exprs = match &select.group_by {
            GroupByExpr::Expressions(exprs) => exprs.clone(),
            GroupByExpr::All => {
                return Err(ParseError::Unsupported("GROUP BY ALL".to_string()));
            }
        };

        Ok(SelectStmt {
            select_fields,
            source,
            where_condition: select.selection.clone(),
            group_by_exprs,
            having: select.having.clone(),
        })
    }

    fn extract_source(&self, from: &[TableWithJoins]) -> Result<SourceInfo, ParseError> {
        let [table] = from else {
            return Err(ParseError::Unsupported(format!(
                "expected exactly one table in FROM, got {}",
                from.len()
            )));
        };
        if !table.joins.is_empty() {
            return Err(ParseError::Unsupported("JOIN".to_string()));
        }
        match &table.relation {
            TableFactor::Table { name, alias, .. } => Ok(SourceInfo::new(
                name.to_string(),
                alias.as_ref().map(|a| a.name.value.clone()),
            )),
            other => Err(ParseError::Unsupported(format!(
                "FROM item must be a table, got: {}",
                other
            ))),
        }
    }
}

impl Default for BatchSqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to parse SQL and return SelectStmt
pub fn parse_sql(sql: &str) -> Result<SelectStmt, ParseError> {
    let parser = BatchSqlParser::new();
    parser.parse(sql)
}
