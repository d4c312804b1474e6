use crate::aggregation::{check_arguments, AggregateFunction, TypeSpec};
use datatypes::ConcreteDatatype;

/// `MIN(x)` / `MAX(x)` over any comparable type.
#[derive(Debug)]
pub struct MinMaxFunction {
    name: &'static str,
}

impl MinMaxFunction {
    pub fn min() -> Self {
        Self { name: "MIN" }
    }

    pub fn max() -> Self {
        Self { name: "MAX" }
    }
}

impl AggregateFunction for MinMaxFunction {
    fn name(&self) -> &str {
        self.name
    }

    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String> {
        check_arguments(&[TypeSpec::Any], input_types)?;
        Ok(input_types[0].clone())
    }
}
