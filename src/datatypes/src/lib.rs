pub mod datatypes;
pub mod schema;
pub mod types;

pub use datatypes::{ConcreteDatatype, DataType};
pub use schema::{ColumnSchema, Schema};
pub use types::{
    BooleanType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    StringType, TimestampType,
};
