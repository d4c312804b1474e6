use crate::aggregation::{check_arguments, AggregateFunction, TypeSpec};
use datatypes::ConcreteDatatype;

/// `COUNT(x)` and `COUNT(*)`.
#[derive(Debug, Default)]
pub struct CountFunction;

impl CountFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for CountFunction {
    fn name(&self) -> &str {
        "COUNT"
    }

    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String> {
        // COUNT(*) arrives with no argument types
        if !input_types.is_empty() {
            check_arguments(&[TypeSpec::Any], input_types)?;
        }
        Ok(ConcreteDatatype::int64())
    }

    fn accepts_wildcard(&self) -> bool {
        true
    }
}
