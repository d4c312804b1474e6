//! Group window descriptors built from the window call in GROUP BY.

use crate::error::PlanError;
use crate::expr::Scope;
use crate::planner::interval::evaluate_interval_ms;
use parser::{parse_window_call, ColPlaceholderAllocator, WindowCall, WindowKind, WindowProperty};
use sqlparser::ast::Expr;
use std::fmt;

/// Window parameters, folded to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpec {
    Tumbling { size_ms: u64 },
    Sliding { size_ms: u64, slide_ms: u64 },
    Session { gap_ms: u64 },
}

impl WindowSpec {
    pub fn kind(&self) -> WindowKind {
        match self {
            WindowSpec::Tumbling { .. } => WindowKind::Tumble,
            WindowSpec::Sliding { .. } => WindowKind::Hop,
            WindowSpec::Session { .. } => WindowKind::Session,
        }
    }
}

/// A validated group window: kind and sizes plus the rowtime column and the
/// alias its properties are named after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    pub alias: String,
    pub time_field: String,
    pub spec: WindowSpec,
}

impl WindowDescriptor {
    /// Synthetic column carrying `property`, e.g. `w$start`.
    pub fn property_name(&self, property: WindowProperty) -> String {
        format!("{}{}", self.alias, property.suffix())
    }
}

impl fmt::Display for WindowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spec {
            WindowSpec::Tumbling { size_ms } => write!(
                f,
                "TumblingGroupWindow({}, {}, {})",
                self.alias, self.time_field, size_ms
            ),
            WindowSpec::Sliding { size_ms, slide_ms } => write!(
                f,
                "SlidingGroupWindow({}, {}, {}, {})",
                self.alias, self.time_field, size_ms, slide_ms
            ),
            WindowSpec::Session { gap_ms } => write!(
                f,
                "SessionGroupWindow({}, {}, {})",
                self.alias, self.time_field, gap_ms
            ),
        }
    }
}

/// Grouping of one windowed aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    /// Non-window GROUP BY columns in their original order, without duplicates.
    pub grouping_columns: Vec<String>,
    pub window: WindowDescriptor,
}

/// Split GROUP BY into exactly one window call and plain grouping columns.
pub fn build_group_spec(
    group_by_exprs: &[Expr],
    scope: &Scope<'_>,
    aliases: &mut ColPlaceholderAllocator,
) -> Result<GroupSpec, PlanError> {
    let mut windows = Vec::new();
    let mut plain = Vec::new();
    for expr in group_by_exprs {
        match parse_window_call(expr)? {
            Some(call) => windows.push(call),
            None => plain.push(expr),
        }
    }

    let call = match windows.as_slice() {
        [call] => call,
        _ => {
            return Err(PlanError::validation(format!(
                "GROUP BY must contain exactly one window function (TUMBLE, HOP or SESSION), found {}",
                windows.len()
            )))
        }
    };

    let (time_field, spec) = resolve_window_call(call, scope)?;
    let window = WindowDescriptor {
        alias: aliases.allocate(),
        time_field,
        spec,
    };

    let mut grouping_columns: Vec<String> = Vec::with_capacity(plain.len());
    for expr in plain {
        let column = scope.resolve_column(expr)?.ok_or_else(|| {
            PlanError::validation(format!(
                "GROUP BY item must be a column reference, got {}",
                expr
            ))
        })?;
        if column.name == window.time_field {
            return Err(PlanError::validation(format!(
                "time attribute {} cannot also be a grouping column",
                column.name
            )));
        }
        if !grouping_columns.contains(&column.name) {
            grouping_columns.push(column.name.clone());
        }
    }

    tracing::debug!(
        window = %window,
        grouping = ?grouping_columns,
        "built group window"
    );
    Ok(GroupSpec {
        grouping_columns,
        window,
    })
}

/// Validate a window call and fold its arguments.
///
/// Returns the resolved time column name and the window parameters. Used for
/// the GROUP BY window and for every boundary function so both can be
/// compared.
pub fn resolve_window_call(
    call: &WindowCall,
    scope: &Scope<'_>,
) -> Result<(String, WindowSpec), PlanError> {
    let function = call.kind.function_name();
    if let Some(offset) = &call.offset {
        return Err(PlanError::UnsupportedWindowOffset(format!(
            "{} does not support an offset argument, got {}",
            function, offset
        )));
    }

    let column = scope.resolve_column(&call.time_field)?.ok_or_else(|| {
        PlanError::validation(format!(
            "time attribute of {} must be a column reference, got {}",
            function, call.time_field
        ))
    })?;
    if !column.data_type.is_timestamp() {
        return Err(PlanError::validation(format!(
            "time attribute {} of {} must be TIMESTAMP, got {}",
            column.name, function, column.data_type
        )));
    }

    let missing = || PlanError::validation(format!("{} is missing its size argument", function));
    let size_ms = evaluate_interval_ms(call.size().ok_or_else(missing)?)?;
    let spec = match call.kind {
        WindowKind::Tumble => WindowSpec::Tumbling { size_ms },
        WindowKind::Hop => {
            let slide_ms = evaluate_interval_ms(call.slide().ok_or_else(missing)?)?;
            WindowSpec::Sliding { size_ms, slide_ms }
        }
        WindowKind::Session => WindowSpec::Session { gap_ms: size_ms },
    };
    Ok((column.name.clone(), spec))
}
