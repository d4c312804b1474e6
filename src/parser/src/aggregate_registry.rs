/// Tells the front end which function names denote aggregates.
pub trait AggregateRegistry: Send + Sync {
    fn is_aggregate_function(&self, name: &str) -> bool;
}
