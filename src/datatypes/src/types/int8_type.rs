use crate::datatypes::DataType;

/// 8-bit signed integer type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int8Type;

impl DataType for Int8Type {
    fn name(&self) -> String {
        "TINYINT".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(0)
    }
}
