use sqlparser::parser::ParserError;

/// Errors raised while turning SQL text into a [`crate::SelectStmt`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("SQL parse error: {0}")]
    Sql(#[from] ParserError),

    #[error("unsupported query: {0}")]
    Unsupported(String),

    #[error("{function} requires {expected} arguments, got {actual}")]
    WindowArity {
        function: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("{function} {message}")]
    WindowArgument { function: String, message: String },
}
