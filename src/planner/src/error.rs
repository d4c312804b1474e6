use parser::ParseError;

/// Errors raised while building a logical plan for a windowed aggregation.
///
/// Every variant is terminal for the query being planned.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Window size, slide or gap is not a constant interval.
    #[error("unsupported window size: {0}")]
    UnsupportedWindowSize(String),

    /// A window function carries an offset argument.
    #[error("unsupported window offset: {0}")]
    UnsupportedWindowOffset(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Parse(ParseError),
}

/// Discriminant of [`PlanError`], for callers asserting which rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanErrorKind {
    UnsupportedWindowSize,
    UnsupportedWindowOffset,
    Validation,
    Parse,
}

impl PlanError {
    pub fn kind(&self) -> PlanErrorKind {
        match self {
            PlanError::UnsupportedWindowSize(_) => PlanErrorKind::UnsupportedWindowSize,
            PlanError::UnsupportedWindowOffset(_) => PlanErrorKind::UnsupportedWindowOffset,
            PlanError::Validation(_) => PlanErrorKind::Validation,
            PlanError::Parse(_) => PlanErrorKind::Parse,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        PlanError::Validation(message.into())
    }
}

impl From<ParseError> for PlanError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::WindowArity { .. } | ParseError::WindowArgument { .. } => {
                PlanError::Validation(err.to_string())
            }
            other => PlanError::Parse(other),
        }
    }
}
