use datatypes::ConcreteDatatype;
use std::fmt;

/// Declared type of one aggregate argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Any,
    /// Any numeric type.
    Numeric,
    /// A concrete type; narrower numeric types widen implicitly.
    Exact(ConcreteDatatype),
}

impl TypeSpec {
    pub fn accepts(&self, actual: &ConcreteDatatype) -> bool {
        match self {
            TypeSpec::Any => true,
            TypeSpec::Numeric => actual.is_numeric(),
            TypeSpec::Exact(expected) => actual.can_coerce_to(expected),
        }
    }

    /// Parse a config-level type name; `ANY` and `NUMERIC` are categories.
    pub fn from_sql_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ANY" => Some(TypeSpec::Any),
            "NUMERIC" => Some(TypeSpec::Numeric),
            _ => ConcreteDatatype::from_sql_name(raw).map(TypeSpec::Exact),
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Any => write!(f, "ANY"),
            TypeSpec::Numeric => write!(f, "NUMERIC"),
            TypeSpec::Exact(datatype) => write!(f, "{}", datatype),
        }
    }
}

/// Check actual argument types against a fixed signature.
///
/// The error names the 1-based argument position, the expected type and the
/// actual type.
pub fn check_arguments(specs: &[TypeSpec], actual: &[ConcreteDatatype]) -> Result<(), String> {
    if specs.len() != actual.len() {
        return Err(format!(
            "expects {} argument(s), got {}",
            specs.len(),
            actual.len()
        ));
    }
    for (idx, (spec, datatype)) in specs.iter().zip(actual).enumerate() {
        if !spec.accepts(datatype) {
            return Err(format!(
                "argument {} expects {}, got {}",
                idx + 1,
                spec,
                datatype
            ));
        }
    }
    Ok(())
}
