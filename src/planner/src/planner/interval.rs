//! Constant folding of window size, slide and gap arguments.

use crate::error::PlanError;
use sqlparser::ast::{
    BinaryOperator, DateTimeField, Expr, Interval, UnaryOperator, Value, Visit, Visitor,
};
use std::ops::ControlFlow;

const MILLIS_PER_SECOND: i128 = 1_000;
const MILLIS_PER_MINUTE: i128 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i128 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i128 = 24 * MILLIS_PER_HOUR;

/// Intermediate constant while folding.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Constant {
    Millis(i128),
    Number(f64),
}

/// Fold a window size/slide/gap expression to a positive number of
/// milliseconds.
///
/// Expressions that read row data fail with
/// [`PlanError::UnsupportedWindowSize`]; constant but invalid sizes (zero,
/// negative, bare numbers) fail with [`PlanError::Validation`].
pub fn evaluate_interval_ms(expr: &Expr) -> Result<u64, PlanError> {
    if let ControlFlow::Break(found) = expr.visit(&mut RowReferenceFinder) {
        return Err(PlanError::UnsupportedWindowSize(format!(
            "window size must be a constant interval, found {} in {}",
            found, expr
        )));
    }
    let millis = match fold(expr)? {
        Constant::Millis(millis) => millis,
        Constant::Number(_) => {
            return Err(PlanError::validation(format!(
                "window size must be an interval, got {}",
                expr
            )))
        }
    };
    if millis <= 0 {
        return Err(PlanError::validation(format!(
            "window size must be positive, got {}",
            expr
        )));
    }
    u64::try_from(millis)
        .map_err(|_| PlanError::validation(format!("window size overflows: {}", expr)))
}

fn fold(expr: &Expr) -> Result<Constant, PlanError> {
    match expr {
        Expr::Interval(interval) => fold_interval(interval, expr).map(Constant::Millis),
        Expr::Value(Value::Number(raw, _)) => parse_number(raw, expr).map(Constant::Number),
        Expr::Nested(inner) => fold(inner),
        Expr::UnaryOp { op, expr: operand } => match op {
            UnaryOperator::Plus => fold(operand),
            UnaryOperator::Minus => Ok(match fold(operand)? {
                Constant::Millis(millis) => Constant::Millis(-millis),
                Constant::Number(n) => Constant::Number(-n),
            }),
            _ => Err(non_constant(expr)),
        },
        Expr::BinaryOp { left, op, right } => {
            let left = fold(left)?;
            let right = fold(right)?;
            fold_binary(left, op, right, expr)
        }
        _ => Err(non_constant(expr)),
    }
}

/// Stops at the first column reference or function call.
struct RowReferenceFinder;

impl Visitor for RowReferenceFinder {
    type Break = Expr;

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Expr> {
        match expr {
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) | Expr::Function(_) => {
                ControlFlow::Break(expr.clone())
            }
            _ => ControlFlow::Continue(()),
        }
    }
}

fn fold_binary(
    left: Constant,
    op: &BinaryOperator,
    right: Constant,
    expr: &Expr,
) -> Result<Constant, PlanError> {
    use Constant::{Millis, Number};

    let folded = match (left, op, right) {
        (Millis(l), BinaryOperator::Plus, Millis(r)) => Millis(l + r),
        (Millis(l), BinaryOperator::Minus, Millis(r)) => Millis(l - r),
        (Number(l), BinaryOperator::Plus, Number(r)) => Number(l + r),
        (Number(l), BinaryOperator::Minus, Number(r)) => Number(l - r),
        (Number(l), BinaryOperator::Multiply, Number(r)) => Number(l * r),
        (Number(n), BinaryOperator::Multiply, Millis(m))
        | (Millis(m), BinaryOperator::Multiply, Number(n)) => Millis(scale(m, n, expr)?),
        (Millis(m), BinaryOperator::Divide, Number(n)) => {
            if n == 0.0 {
                return Err(PlanError::validation(format!(
                    "division by zero in window size {}",
                    expr
                )));
            }
            Millis(scale(m, 1.0 / n, expr)?)
        }
        (Number(l), BinaryOperator::Divide, Number(r)) if r != 0.0 => Number(l / r),
        _ => {
            return Err(PlanError::validation(format!(
                "invalid interval arithmetic: {}",
                expr
            )))
        }
    };
    Ok(folded)
}

fn scale(millis: i128, factor: f64, expr: &Expr) -> Result<i128, PlanError> {
    let scaled = (millis as f64 * factor).round();
    if !scaled.is_finite() || scaled.abs() > u64::MAX as f64 {
        return Err(PlanError::validation(format!(
            "window size overflows: {}",
            expr
        )));
    }
    Ok(scaled as i128)
}

fn fold_interval(interval: &Interval, expr: &Expr) -> Result<i128, PlanError> {
    if interval.last_field.is_some() {
        return Err(PlanError::UnsupportedWindowSize(format!(
            "interval ranges are not supported as window size: {}",
            expr
        )));
    }
    match &interval.leading_field {
        Some(field) => {
            let unit = field_millis(field, expr)?;
            let amount = match interval.value.as_ref() {
                Expr::Value(Value::SingleQuotedString(raw)) => parse_number(raw.trim(), expr)?,
                other => match fold(other)? {
                    Constant::Number(n) => n,
                    Constant::Millis(_) => {
                        return Err(PlanError::validation(format!(
                            "invalid interval literal: {}",
                            expr
                        )))
                    }
                },
            };
            scale(unit, amount, expr)
        }
        None => match interval.value.as_ref() {
            Expr::Value(Value::SingleQuotedString(raw)) => parse_interval_string(raw, expr),
            _ => Err(PlanError::validation(format!(
                "interval {} has no unit",
                expr
            ))),
        },
    }
}

fn field_millis(field: &DateTimeField, expr: &Expr) -> Result<i128, PlanError> {
    match field {
        DateTimeField::Day => Ok(MILLIS_PER_DAY),
        DateTimeField::Hour => Ok(MILLIS_PER_HOUR),
        DateTimeField::Minute => Ok(MILLIS_PER_MINUTE),
        DateTimeField::Second => Ok(MILLIS_PER_SECOND),
        DateTimeField::Year | DateTimeField::Month => Err(year_month(expr)),
        other => match other.to_string().as_str() {
            "MILLISECOND" | "MILLISECONDS" => Ok(1),
            _ => Err(PlanError::UnsupportedWindowSize(format!(
                "unsupported interval unit {} in {}",
                other, expr
            ))),
        },
    }
}

/// Parse the unit-less form, e.g. `INTERVAL '1 hour 30 minutes'`.
fn parse_interval_string(raw: &str, expr: &Expr) -> Result<i128, PlanError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(PlanError::validation(format!(
            "invalid interval literal: {}",
            expr
        )));
    }
    let mut total = 0i128;
    for pair in tokens.chunks(2) {
        let amount = parse_number(pair[0], expr)?;
        let unit = match pair[1].to_ascii_lowercase().as_str() {
            "ms" | "millisecond" | "milliseconds" => 1,
            "s" | "sec" | "secs" | "second" | "seconds" => MILLIS_PER_SECOND,
            "min" | "mins" | "minute" | "minutes" => MILLIS_PER_MINUTE,
            "h" | "hour" | "hours" => MILLIS_PER_HOUR,
            "d" | "day" | "days" => MILLIS_PER_DAY,
            "mon" | "mons" | "month" | "months" | "year" | "years" => {
                return Err(year_month(expr))
            }
            other => {
                return Err(PlanError::validation(format!(
                    "unknown interval unit '{}' in {}",
                    other, expr
                )))
            }
        };
        total += scale(unit, amount, expr)?;
    }
    Ok(total)
}

fn parse_number(raw: &str, expr: &Expr) -> Result<f64, PlanError> {
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| PlanError::validation(format!("invalid number '{}' in {}", raw, expr)))
}

fn year_month(expr: &Expr) -> PlanError {
    PlanError::UnsupportedWindowSize(format!(
        "year-month intervals have no fixed length: {}",
        expr
    ))
}

fn non_constant(expr: &Expr) -> PlanError {
    PlanError::UnsupportedWindowSize(format!(
        "window size must be a constant interval: {}",
        expr
    ))
}
