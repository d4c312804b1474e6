use crate::types::{
    BooleanType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, StringType,
    TimestampType,
};
use std::fmt;

/// Data type abstraction trait
pub trait DataType: std::fmt::Debug + Send + Sync {
    /// SQL name of this data type
    fn name(&self) -> String;

    /// Position in the implicit numeric widening chain.
    /// `None` for non-numeric types.
    fn numeric_rank(&self) -> Option<u8> {
        None
    }
}

/// Concrete data type definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConcreteDatatype {
    /// Boolean type
    Bool(BooleanType),
    /// 8-bit signed integer
    Int8(Int8Type),
    /// 16-bit signed integer
    Int16(Int16Type),
    /// 32-bit signed integer
    Int32(Int32Type),
    /// 64-bit signed integer
    Int64(Int64Type),
    /// 32-bit floating point number
    Float32(Float32Type),
    /// 64-bit floating point number
    Float64(Float64Type),
    /// String type
    String(StringType),
    /// Timestamp with millisecond precision
    Timestamp(TimestampType),
}

impl ConcreteDatatype {
    pub fn boolean() -> Self {
        ConcreteDatatype::Bool(BooleanType)
    }

    pub fn int32() -> Self {
        ConcreteDatatype::Int32(Int32Type)
    }

    pub fn int64() -> Self {
        ConcreteDatatype::Int64(Int64Type)
    }

    pub fn float64() -> Self {
        ConcreteDatatype::Float64(Float64Type)
    }

    pub fn string() -> Self {
        ConcreteDatatype::String(StringType)
    }

    pub fn timestamp() -> Self {
        ConcreteDatatype::Timestamp(TimestampType)
    }

    pub fn as_data_type(&self) -> &dyn DataType {
        match self {
            ConcreteDatatype::Bool(t) => t,
            ConcreteDatatype::Int8(t) => t,
            ConcreteDatatype::Int16(t) => t,
            ConcreteDatatype::Int32(t) => t,
            ConcreteDatatype::Int64(t) => t,
            ConcreteDatatype::Float32(t) => t,
            ConcreteDatatype::Float64(t) => t,
            ConcreteDatatype::String(t) => t,
            ConcreteDatatype::Timestamp(t) => t,
        }
    }

    pub fn name(&self) -> String {
        self.as_data_type().name()
    }

    pub fn is_numeric(&self) -> bool {
        self.as_data_type().numeric_rank().is_some()
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ConcreteDatatype::Int8(_)
                | ConcreteDatatype::Int16(_)
                | ConcreteDatatype::Int32(_)
                | ConcreteDatatype::Int64(_)
        )
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, ConcreteDatatype::Timestamp(_))
    }

    /// Whether a value of this type can be passed where `target` is expected
    /// without an explicit cast. Numeric types only widen.
    pub fn can_coerce_to(&self, target: &ConcreteDatatype) -> bool {
        if self == target {
            return true;
        }
        match (
            self.as_data_type().numeric_rank(),
            target.as_data_type().numeric_rank(),
        ) {
            (Some(from), Some(to)) => from <= to,
            _ => false,
        }
    }

    /// Result type of an arithmetic expression over two numeric operands.
    pub fn common_numeric_type(
        left: &ConcreteDatatype,
        right: &ConcreteDatatype,
    ) -> Option<ConcreteDatatype> {
        let l = left.as_data_type().numeric_rank()?;
        let r = right.as_data_type().numeric_rank()?;
        Some(if l >= r { left.clone() } else { right.clone() })
    }

    /// Resolve a SQL type name such as `BIGINT` or `varchar(32)`.
    pub fn from_sql_name(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase();
        let base = match upper.find('(') {
            Some(idx) => upper[..idx].trim_end(),
            None => upper.as_str(),
        };
        let datatype = match base {
            "BOOLEAN" | "BOOL" => ConcreteDatatype::Bool(BooleanType),
            "TINYINT" => ConcreteDatatype::Int8(Int8Type),
            "SMALLINT" => ConcreteDatatype::Int16(Int16Type),
            "INT" | "INTEGER" => ConcreteDatatype::Int32(Int32Type),
            "BIGINT" => ConcreteDatatype::Int64(Int64Type),
            "FLOAT" | "REAL" => ConcreteDatatype::Float32(Float32Type),
            "DOUBLE" => ConcreteDatatype::Float64(Float64Type),
            "VARCHAR" | "STRING" | "CHAR" | "TEXT" => ConcreteDatatype::String(StringType),
            "TIMESTAMP" => ConcreteDatatype::Timestamp(TimestampType),
            _ => return None,
        };
        Some(datatype)
    }
}

impl fmt::Display for ConcreteDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
