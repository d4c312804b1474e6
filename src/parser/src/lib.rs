pub mod aggregate_registry;
pub mod col_placeholder_allocator;
pub mod dialect;
pub mod error;
pub mod parser;
pub mod select_stmt;
pub mod visitor;
pub mod window;

pub use aggregate_registry::AggregateRegistry;
pub use col_placeholder_allocator::ColPlaceholderAllocator;
pub use dialect::BatchDialect;
pub use error::ParseError;
pub use parser::{parse_sql, BatchSqlParser};
pub use select_stmt::{SelectField, SelectStmt, SourceInfo};
pub use visitor::{
    contains_aggregates_with_visitor, extract_aggregates_with_visitor, AggregateCallRef,
    AggregateVisitor,
};
pub use window::{
    is_window_function_name, parse_window_call, parse_window_property, WindowCall, WindowKind,
    WindowProperty, WindowPropertyCall,
};
