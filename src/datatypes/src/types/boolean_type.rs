use crate::datatypes::DataType;

/// Boolean type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BooleanType;

impl DataType for BooleanType {
    fn name(&self) -> String {
        "BOOLEAN".to_string()
    }
}
