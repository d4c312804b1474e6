/// SQL dialect for batch window queries.
///
/// Window functions (`TUMBLE`, `HOP`, `SESSION`) and their boundary functions
/// (`TUMBLE_START`, ...) parse as ordinary function calls; recognizing them is
/// left to [`crate::window`].
#[derive(Debug, Clone)]
pub struct BatchDialect {}

impl BatchDialect {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for BatchDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl sqlparser::dialect::Dialect for BatchDialect {
    fn is_identifier_start(&self, ch: char) -> bool {
        ch.is_alphabetic() || ch == '_'
    }

    fn is_identifier_part(&self, ch: char) -> bool {
        ch.is_alphabetic() || ch.is_ascii_digit() || ch == '_'
    }

    fn is_delimited_identifier_start(&self, ch: char) -> bool {
        ch == '`' || ch == '"'
    }

    fn supports_filter_during_aggregation(&self) -> bool {
        true
    }

    fn supports_group_by_expr(&self) -> bool {
        true
    }
}
