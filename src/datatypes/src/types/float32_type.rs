use crate::datatypes::DataType;

/// 32-bit floating point number type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Float32Type;

impl DataType for Float32Type {
    fn name(&self) -> String {
        "FLOAT".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(4)
    }
}
