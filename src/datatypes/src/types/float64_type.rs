use crate::datatypes::DataType;

/// 64-bit floating point number type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Float64Type;

impl DataType for Float64Type {
    fn name(&self) -> String {
        "DOUBLE".to_string()
    }

    fn numeric_rank(&self) -> Option<u8> {
        Some(5)
    }
}
