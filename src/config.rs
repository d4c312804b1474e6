use planner::{
    AggregateFunctionRegistry, Catalog, CatalogError, ColumnSchema, ConcreteDatatype, Schema,
    TableDefinition, TypeSpec, UserDefinedAggregate,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Errors raised while turning config sections into catalog entries.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown type '{type_name}' for {owner}")]
    UnknownType { owner: String, type_name: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
    pub functions: Vec<FunctionConfig>,
    pub explain: ExplainConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub output: LoggingOutput,
    pub level: LogLevel,
    pub include_source: bool,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            output: LoggingOutput::Stdout,
            level: LogLevel::Info,
            include_source: true,
            file: FileLoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingOutput {
    Stdout,
    File,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub dir: String,
    pub file_name: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            dir: "./logs".to_string(),
            file_name: "velo-window.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// A user-defined aggregate: argument type specs (`ANY`, `NUMERIC` or a
/// type name) and the result type.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionConfig {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub returns: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    pub format: ExplainFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainFormat {
    #[default]
    Topology,
    Table,
    Json,
}

impl FromStr for ExplainFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "topology" => Ok(ExplainFormat::Topology),
            "table" => Ok(ExplainFormat::Table),
            "json" => Ok(ExplainFormat::Json),
            other => Err(format!(
                "unknown explain format '{}', expected topology, table or json",
                other
            )),
        }
    }
}

impl AppConfig {
    pub fn load_required(
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("failed to read config file {}: {}", path.display(), err))?;
        let cfg: AppConfig = serde_yaml::from_str(&raw)
            .map_err(|err| format!("failed to parse yaml config {}: {}", path.display(), err))?;
        Ok(cfg)
    }

    pub fn load_optional(
        path: impl AsRef<Path>,
    ) -> Result<Option<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load_required(path)?))
    }

    /// Build a catalog holding every configured table.
    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        let catalog = Catalog::new();
        for table in &self.catalog.tables {
            let columns = table
                .columns
                .iter()
                .map(|column| {
                    let data_type = ConcreteDatatype::from_sql_name(&column.data_type).ok_or_else(
                        || ConfigError::UnknownType {
                            owner: format!("column {}.{}", table.name, column.name),
                            type_name: column.data_type.clone(),
                        },
                    )?;
                    Ok(ColumnSchema::new(
                        table.name.clone(),
                        column.name.clone(),
                        data_type,
                    ))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            catalog.insert(TableDefinition::new(
                table.name.clone(),
                Arc::new(Schema::new(columns)),
            ))?;
            tracing::debug!(table = %table.name, "registered table");
        }
        Ok(catalog)
    }

    /// Register the configured user-defined aggregates.
    pub fn register_functions(
        &self,
        registry: &AggregateFunctionRegistry,
    ) -> Result<(), ConfigError> {
        for function in &self.functions {
            let owner = format!("function {}", function.name);
            let arg_types = function
                .args
                .iter()
                .map(|raw| {
                    TypeSpec::from_sql_name(raw).ok_or_else(|| ConfigError::UnknownType {
                        owner: owner.clone(),
                        type_name: raw.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let return_type = ConcreteDatatype::from_sql_name(&function.returns).ok_or_else(
                || ConfigError::UnknownType {
                    owner: owner.clone(),
                    type_name: function.returns.clone(),
                },
            )?;
            registry.register_function(Arc::new(UserDefinedAggregate::new(
                function.name.clone(),
                arg_types,
                return_type,
            )));
            tracing::debug!(function = %function.name, "registered aggregate function");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("velo_window_test.{}.{}.yaml", name, nanos))
    }

    #[test]
    fn loads_optional_missing_file() {
        let path = unique_temp_path("missing");
        let loaded = AppConfig::load_optional(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn default_logging_is_stdout_with_source() {
        let cfg = AppConfig::default();
        match cfg.logging.output {
            LoggingOutput::Stdout => {}
            LoggingOutput::File => panic!("expected default logging.output=stdout"),
        }
        assert!(cfg.logging.include_source);
        match cfg.logging.level {
            LogLevel::Info => {}
            _ => panic!("expected default logging.level=info"),
        }
        assert_eq!(cfg.explain.format, ExplainFormat::Topology);
    }

    #[test]
    fn loads_logging_config() {
        let yaml = r#"
logging:
  output: file
  level: warn
  include_source: false
  file:
    dir: "./tmp/logs"
    file_name: "planner.log"
"#;
        let path = unique_temp_path("logging");
        std::fs::write(&path, yaml).unwrap();

        let cfg = AppConfig::load_required(&path).unwrap();
        match cfg.logging.output {
            LoggingOutput::File => {}
            _ => panic!("expected output=file"),
        }
        match cfg.logging.level {
            LogLevel::Warn => {}
            _ => panic!("expected level=warn"),
        }
        assert!(!cfg.logging.include_source);
        assert_eq!(cfg.logging.file.dir, "./tmp/logs");
        assert_eq!(cfg.logging.file.file_name, "planner.log");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn builds_catalog_and_functions() {
        let yaml = r#"
catalog:
  tables:
    - name: orders
      columns:
        - { name: amount, type: BIGINT }
        - { name: region, type: VARCHAR }
        - { name: ts, type: TIMESTAMP }
functions:
  - name: weightedAvg
    args: [NUMERIC, BIGINT]
    returns: DOUBLE
explain:
  format: json
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.explain.format, ExplainFormat::Json);

        let catalog = cfg.build_catalog().unwrap();
        let orders = catalog.get("ORDERS").unwrap();
        assert_eq!(orders.schema().column_names(), vec!["amount", "region", "ts"]);

        let registry = AggregateFunctionRegistry::new();
        cfg.register_functions(&registry).unwrap();
        assert!(registry.is_registered("weightedavg"));
    }

    #[test]
    fn rejects_unknown_column_type() {
        let yaml = r#"
catalog:
  tables:
    - name: t
      columns:
        - { name: a, type: BLOB }
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let err = cfg.build_catalog().unwrap_err();
        assert_eq!(err.to_string(), "unknown type 'BLOB' for column t.a");
    }

    #[test]
    fn rejects_duplicate_tables() {
        let yaml = r#"
catalog:
  tables:
    - { name: t, columns: [] }
    - { name: T, columns: [] }
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            cfg.build_catalog(),
            Err(ConfigError::Catalog(CatalogError::AlreadyExists(_)))
        ));
    }

    #[test]
    fn parses_explain_format_flag() {
        assert_eq!("TABLE".parse::<ExplainFormat>(), Ok(ExplainFormat::Table));
        assert!("yaml".parse::<ExplainFormat>().is_err());
    }
}
