use crate::datatypes::ConcreteDatatype;

/// A named, typed column owned by a source (table or plan node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSchema {
    pub source_name: String,
    pub name: String,
    pub data_type: ConcreteDatatype,
}

impl ColumnSchema {
    pub fn new(source_name: String, name: String, data_type: ConcreteDatatype) -> Self {
        Self {
            source_name,
            name,
            data_type,
        }
    }
}

/// Ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    column_schemas: Vec<ColumnSchema>,
}

impl Schema {
    pub fn new(column_schemas: Vec<ColumnSchema>) -> Self {
        Self { column_schemas }
    }

    pub fn column_schemas(&self) -> &[ColumnSchema] {
        &self.column_schemas
    }

    pub fn len(&self) -> usize {
        self.column_schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.column_schemas.is_empty()
    }

    /// Case-insensitive lookup, SQL identifiers are not case sensitive here.
    pub fn column_schema_by_name(&self, name: &str) -> Option<&ColumnSchema> {
        self.column_schemas
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> Vec<String> {
        self.column_schemas.iter().map(|c| c.name.clone()).collect()
    }
}
