pub mod boolean_type;
pub mod float32_type;
pub mod float64_type;
pub mod int16_type;
pub mod int32_type;
pub mod int64_type;
pub mod int8_type;
pub mod string_type;
pub mod timestamp_type;

pub use boolean_type::BooleanType;
pub use float32_type::Float32Type;
pub use float64_type::Float64Type;
pub use int16_type::Int16Type;
pub use int32_type::Int32Type;
pub use int64_type::Int64Type;
pub use int8_type::Int8Type;
pub use string_type::StringType;
pub use timestamp_type::TimestampType;
