//! Visitor pattern implementations for SQL AST traversal

pub mod aggregate_visitor;

pub use aggregate_visitor::{
    contains_aggregates_with_visitor, extract_aggregates_with_visitor, AggregateCallRef,
    AggregateVisitor,
};
