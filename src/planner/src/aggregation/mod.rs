mod avg;
mod count;
mod min_max;
mod registry;
mod signature;
mod sum;
mod udaf;

pub use avg::AvgFunction;
pub use count::CountFunction;
pub use min_max::MinMaxFunction;
pub use registry::{AggregateFunction, AggregateFunctionRegistry};
pub use signature::{check_arguments, TypeSpec};
pub use sum::SumFunction;
pub use udaf::UserDefinedAggregate;
