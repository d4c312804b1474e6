use crate::aggregation::{check_arguments, AggregateFunction, TypeSpec};
use datatypes::ConcreteDatatype;

#[derive(Debug, Default)]
pub struct AvgFunction;

impl AvgFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for AvgFunction {
    fn name(&self) -> &str {
        "AVG"
    }

    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String> {
        check_arguments(&[TypeSpec::Numeric], input_types)?;
        Ok(input_types[0].clone())
    }
}
