use datatypes::{ColumnSchema, ConcreteDatatype, Schema};

fn orders_schema() -> Schema {
    Schema::new(vec![
        ColumnSchema::new("orders".to_string(), "a".to_string(), ConcreteDatatype::int32()),
        ColumnSchema::new("orders".to_string(), "b".to_string(), ConcreteDatatype::int64()),
        ColumnSchema::new("orders".to_string(), "ts".to_string(), ConcreteDatatype::timestamp()),
    ])
}

#[test]
fn test_lookup_is_case_insensitive() {
    let schema = orders_schema();
    let column = schema.column_schema_by_name("TS").unwrap();
    assert_eq!(column.name, "ts");
    assert!(column.data_type.is_timestamp());
    assert_eq!(schema.column_schema_by_name("B").unwrap().name, "b");
    assert!(schema.column_schema_by_name("missing").is_none());
}

#[test]
fn test_column_names_keep_declaration_order() {
    let schema = orders_schema();
    assert_eq!(schema.column_names(), vec!["a", "b", "ts"]);
    assert_eq!(schema.len(), 3);
    assert!(!schema.is_empty());
}
