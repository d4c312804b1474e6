use crate::datatypes::DataType;

/// Millisecond precision timestamp without time zone.
///
/// Window time attributes and window boundaries are both typed as this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampType;

impl TimestampType {
    /// Fractional second digits carried by the type.
    pub const PRECISION: u64 = 3;
}

impl DataType for TimestampType {
    fn name(&self) -> String {
        format!("TIMESTAMP({})", Self::PRECISION)
    }
}
