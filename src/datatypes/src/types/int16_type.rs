use crate::datatypes::DataType;

/// 16-bit signed integer type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Int16Type;

impl DataType for Int16Type {
    fn name(&self) -> String {
        "SMALLINT".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(1)
    }
}
