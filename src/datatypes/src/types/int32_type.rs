use crate::datatypes::DataType;

/// 32-bit signed integer type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int32Type;

impl DataType for Int32Type {
    fn name(&self) -> String {
        "INT".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(2)
    }
}
