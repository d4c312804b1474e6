use datatypes::Schema;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Errors that can occur when mutating the catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("table already exists: {0}")]
    AlreadyExists(String),
}

/// A table known to the planner: name plus column layout.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    name: String,
    schema: Arc<Schema>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}

/// Table resolver used during planning. Lookups ignore case.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: RwLock<HashMap<String, Arc<TableDefinition>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, table_name: &str) -> Option<Arc<TableDefinition>> {
        self.tables.read().get(&table_name.to_lowercase()).cloned()
    }

    /// All tables, sorted by name.
    pub fn list(&self) -> Vec<Arc<TableDefinition>> {
        let mut tables: Vec<_> = self.tables.read().values().cloned().collect();
        tables.sort_by(|a, b| a.name().cmp(b.name()));
        tables
    }

    pub fn insert(
        &self,
        definition: TableDefinition,
    ) -> Result<Arc<TableDefinition>, CatalogError> {
        let mut guard = self.tables.write();
        let key = definition.name().to_lowercase();
        if guard.contains_key(&key) {
            return Err(CatalogError::AlreadyExists(definition.name().to_string()));
        }
        let definition = Arc::new(definition);
        guard.insert(key, definition.clone());
        Ok(definition)
    }
}
