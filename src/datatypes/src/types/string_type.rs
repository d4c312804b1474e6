use crate::datatypes::DataType;

/// String type
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringType;

impl DataType for StringType {
    fn name(&self) -> String {
        "VARCHAR".to_string()
    }
}
