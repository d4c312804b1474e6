use crate::aggregation::{check_arguments, AggregateFunction, TypeSpec};
use datatypes::ConcreteDatatype;

#[derive(Debug, Default)]
pub struct SumFunction;

impl SumFunction {
    pub fn new() -> Self {
        Self
    }
}

impl AggregateFunction for SumFunction {
    fn name(&self) -> &str {
        "SUM"
    }

    /// Return type matches the input numeric type.
    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String> {
        check_arguments(&[TypeSpec::Numeric], input_types)?;
        Ok(input_types[0].clone())
    }
}
