use crate::aggregation::{AvgFunction, CountFunction, MinMaxFunction, SumFunction};
use datatypes::ConcreteDatatype;
use parking_lot::RwLock;
use parser::AggregateRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// Signature of an aggregate function as seen by the planner.
pub trait AggregateFunction: Send + Sync {
    /// Name used when rendering calls.
    fn name(&self) -> &str;
    /// Validate argument types and compute the result type.
    fn return_type(&self, input_types: &[ConcreteDatatype]) -> Result<ConcreteDatatype, String>;
    /// Whether `f(*)` is a valid call.
    fn accepts_wildcard(&self) -> bool {
        false
    }
}

/// Built-in and user-registered aggregates, keyed by lowercase name.
///
/// Registration happens before planning; planning only reads.
pub struct AggregateFunctionRegistry {
    functions: RwLock<HashMap<String, Arc<dyn AggregateFunction>>>,
}

impl AggregateFunctionRegistry {
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_builtins() -> Arc<Self> {
        let registry = Arc::new(Self::new());
        registry.register_builtin_functions();
        registry
    }

    pub fn register_function(&self, function: Arc<dyn AggregateFunction>) {
        self.functions
            .write()
            .insert(function.name().to_lowercase(), function);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn AggregateFunction>> {
        self.functions.read().get(&name.to_lowercase()).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.functions.read().contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .read()
            .values()
            .map(|f| f.name().to_string())
            .collect();
        names.sort();
        names
    }

    fn register_builtin_functions(&self) {
        self.register_function(Arc::new(CountFunction::new()));
        self.register_function(Arc::new(SumFunction::new()));
        self.register_function(Arc::new(AvgFunction::new()));
        self.register_function(Arc::new(MinMaxFunction::min()));
        self.register_function(Arc::new(MinMaxFunction::max()));
    }
}

impl Default for AggregateFunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRegistry for AggregateFunctionRegistry {
    fn is_aggregate_function(&self, name: &str) -> bool {
        self.is_registered(name)
    }
}
