use crate::aggregation::{check_arguments, AggregateFunction, TypeSpec};
use datatypes::ConcreteDatatype;

/// A user-registered aggregate with a declared signature.
///
/// Only the signature is known to the planner; execution lives elsewhere.
#[derive(Debug, Clone)]
pub struct UserDefinedAggregate {
    name: String,
    arg_types: Vec<TypeSpec>,
    return_type: ConcreteDatatype,
}

impl UserDefinedAggregate {
    pub fn new(
        name: impl Into<String>,
        arg_types: Vec<TypeSpec>,
        return_type: ConcreteDatatype,
    ) -> Self {
        Self {
            name: name.into(),
            arg_types,
            return_type,
        }
    }
}

impl AggregateFunction for UserDefinedAggregate {
    fn name(&self) -> &str {
        &self.name
    }

    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String> {
        check_arguments(&self.arg_types, input_types)?;
        Ok(self.return_type.clone())
    }
}
