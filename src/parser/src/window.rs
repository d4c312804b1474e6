//! Recognition of group window functions and their boundary functions.
//!
//! - `TUMBLE(time_col, size [, offset])`
//! - `HOP(time_col, slide, size [, offset])`
//! - `SESSION(time_col, gap [, offset])`
//! - `{TUMBLE|HOP|SESSION}_{START|END|ROWTIME}(<same arguments>)`
//!
//! Only the call shape is checked here. Folding sizes to constants and
//! rejecting offsets happens during planning.

use sqlparser::ast::{Expr, Function, FunctionArg, FunctionArgExpr};

use crate::error::ParseError;

/// Group window kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// Fixed-size, non-overlapping window
    Tumble,
    /// Fixed-size window advancing by a slide interval
    Hop,
    /// Window closed by a gap of inactivity
    Session,
}

/// Synthetic attributes a group window exposes to the select list.
///
/// Ordering follows the canonical output order: start, end, rowtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowProperty {
    Start,
    End,
    Rowtime,
}

/// A window function call found in GROUP BY.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCall {
    pub kind: WindowKind,
    pub time_field: Expr,
    /// Interval arguments in call order: `[size]` for TUMBLE, `[slide, size]`
    /// for HOP, `[gap]` for SESSION.
    pub intervals: Vec<Expr>,
    /// Trailing alignment argument, syntactically accepted only.
    pub offset: Option<Expr>,
}

/// A boundary function call such as `TUMBLE_END(ts, INTERVAL '1' HOUR)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPropertyCall {
    pub property: WindowProperty,
    pub window: WindowCall,
}

impl WindowKind {
    pub fn function_name(&self) -> &'static str {
        match self {
            WindowKind::Tumble => "TUMBLE",
            WindowKind::Hop => "HOP",
            WindowKind::Session => "SESSION",
        }
    }

    /// Number of interval arguments following the time attribute.
    pub fn interval_arity(&self) -> usize {
        match self {
            WindowKind::Tumble | WindowKind::Session => 1,
            WindowKind::Hop => 2,
        }
    }

    fn expected_args(&self) -> &'static str {
        match self {
            WindowKind::Tumble | WindowKind::Session => "2 or 3",
            WindowKind::Hop => "3 or 4",
        }
    }

    pub fn from_function_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "TUMBLE" => Some(WindowKind::Tumble),
            "HOP" => Some(WindowKind::Hop),
            "SESSION" => Some(WindowKind::Session),
            _ => None,
        }
    }
}

impl WindowProperty {
    pub const ALL: [WindowProperty; 3] = [
        WindowProperty::Start,
        WindowProperty::End,
        WindowProperty::Rowtime,
    ];

    /// Suffix appended to the window alias to name the synthetic column.
    pub fn suffix(&self) -> &'static str {
        match self {
            WindowProperty::Start => "start",
            WindowProperty::End => "end",
            WindowProperty::Rowtime => "rowtime",
        }
    }

    fn from_suffix(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "START" => Some(WindowProperty::Start),
            "END" => Some(WindowProperty::End),
            "ROWTIME" => Some(WindowProperty::Rowtime),
            _ => None,
        }
    }
}

impl WindowCall {
    /// Slide argument of a HOP window.
    pub fn slide(&self) -> Option<&Expr> {
        match self.kind {
            WindowKind::Hop => self.intervals.first(),
            WindowKind::Tumble | WindowKind::Session => None,
        }
    }

    /// Size argument (TUMBLE, HOP) or gap argument (SESSION).
    pub fn size(&self) -> Option<&Expr> {
        self.intervals.last()
    }
}

/// Attempt to parse a group window function from an expression.
///
/// Returns `Ok(None)` when the expression is not a window function call.
pub fn parse_window_call(expr: &Expr) -> Result<Option<WindowCall>, ParseError> {
    let Expr::Function(function) = expr else {
        return Ok(None);
    };
    let Some(kind) = WindowKind::from_function_name(&function_base_name(function)) else {
        return Ok(None);
    };
    build_window_call(kind, function, kind.function_name()).map(Some)
}

/// Attempt to parse a window boundary function from an expression.
pub fn parse_window_property(expr: &Expr) -> Result<Option<WindowPropertyCall>, ParseError> {
    let Expr::Function(function) = expr else {
        return Ok(None);
    };
    let name = function_base_name(function);
    let Some((prefix, suffix)) = name.rsplit_once('_') else {
        return Ok(None);
    };
    let (Some(kind), Some(property)) = (
        WindowKind::from_function_name(prefix),
        WindowProperty::from_suffix(suffix),
    ) else {
        return Ok(None);
    };
    let display_name = name.to_ascii_uppercase();
    let window = build_window_call(kind, function, &display_name)?;
    Ok(Some(WindowPropertyCall { property, window }))
}

/// Whether the name belongs to a window or window boundary function.
pub fn is_window_function_name(name: &str) -> bool {
    if WindowKind::from_function_name(name).is_some() {
        return true;
    }
    match name.rsplit_once('_') {
        Some((prefix, suffix)) => {
            WindowKind::from_function_name(prefix).is_some()
                && WindowProperty::from_suffix(suffix).is_some()
        }
        None => false,
    }
}

fn function_base_name(function: &Function) -> String {
    function
        .name
        .0
        .last()
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

fn build_window_call(
    kind: WindowKind,
    function: &Function,
    display_name: &str,
) -> Result<WindowCall, ParseError> {
    if function.over.is_some() {
        return Err(ParseError::WindowArgument {
            function: display_name.to_string(),
            message: "does not support OVER".to_string(),
        });
    }
    if function.distinct {
        return Err(ParseError::WindowArgument {
            function: display_name.to_string(),
            message: "does not support DISTINCT".to_string(),
        });
    }

    let mut args = function
        .args
        .iter()
        .enumerate()
        .map(|(idx, arg)| expr_arg(arg, display_name, idx))
        .collect::<Result<Vec<_>, _>>()?;

    let required = 1 + kind.interval_arity();
    if args.len() != required && args.len() != required + 1 {
        return Err(ParseError::WindowArity {
            function: display_name.to_string(),
            expected: kind.expected_args(),
            actual: args.len(),
        });
    }

    let offset = if args.len() > required {
        args.pop()
    } else {
        None
    };
    let time_field = args.remove(0);

    Ok(WindowCall {
        kind,
        time_field,
        intervals: args,
        offset,
    })
}

fn expr_arg(arg: &FunctionArg, func_name: &str, idx: usize) -> Result<Expr, ParseError> {
    match arg {
        FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => Ok(expr.clone()),
        _ => Err(ParseError::WindowArgument {
            function: func_name.to_string(),
            message: format!("argument {} must be an unnamed expression", idx + 1),
        }),
    }
}
