use crate::datatypes::DataType;

/// 64-bit signed integer type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int64Type;

impl DataType for Int64Type {
    fn name(&self) -> String {
        "BIGINT".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(3)
    }
}
