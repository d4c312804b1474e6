//! Bootstrap utilities for the `velo-window` binary.
//!
//! This module handles:
//! - CLI argument parsing (--config, --format, --sql, trailing SQL text)
//! - Config file loading (explicit path or ./velo-window.yaml)
//! - Logging setup
//! - Catalog and aggregate registry preparation

use crate::config::{AppConfig, ExplainFormat};
use crate::logging::LoggingGuard;
use planner::{AggregateFunctionRegistry, Catalog};
use std::path::Path;
use std::sync::Arc;

/// Config read from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "velo-window.yaml";

/// Result of the default initialization process.
pub struct BootstrapResult {
    pub catalog: Catalog,
    /// Built-in aggregates plus the configured user-defined ones.
    pub registry: Arc<AggregateFunctionRegistry>,
    /// Explain format, CLI flag over config.
    pub format: ExplainFormat,
    /// SQL given on the command line, if any.
    pub sql: Option<String>,
    /// Logging guard that must be kept alive for the lifetime of the application.
    pub logging_guard: LoggingGuard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliFlags {
    pub config_path: Option<String>,
    pub format: Option<ExplainFormat>,
    pub sql: Option<String>,
}

impl CliFlags {
    pub fn parse() -> Result<Self, String> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse flags; words that are not flags are joined into the SQL text.
    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut flags = CliFlags::default();
        let mut trailing = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    flags.config_path = Some(args.next().ok_or("--config requires a path")?);
                }
                "--format" => {
                    let raw = args.next().ok_or("--format requires a value")?;
                    flags.format = Some(raw.parse()?);
                }
                "--sql" => {
                    flags.sql = Some(args.next().ok_or("--sql requires a statement")?);
                }
                _ => trailing.push(arg),
            }
        }
        if flags.sql.is_none() && !trailing.is_empty() {
            flags.sql = Some(trailing.join(" "));
        }
        Ok(flags)
    }
}

/// Perform default initialization: parse CLI, load config, init logging,
/// build the catalog and the aggregate registry.
pub fn default_init() -> Result<BootstrapResult, Box<dyn std::error::Error + Send + Sync>> {
    let cli_flags = CliFlags::parse()?;
    let (config, loaded_config_path) =
        load_config(cli_flags.config_path.as_deref(), DEFAULT_CONFIG_PATH)?;

    let logging_guard = crate::logging::init_logging(&config.logging)?;
    if let Some(path) = loaded_config_path.as_deref() {
        tracing::info!(config_path = path, "loaded config");
    }

    let catalog = config.build_catalog()?;
    let registry = AggregateFunctionRegistry::with_builtins();
    config.register_functions(&registry)?;
    tracing::info!(
        tables = catalog.list().len(),
        functions = registry.function_names().len(),
        "catalog ready"
    );

    Ok(BootstrapResult {
        catalog,
        registry,
        format: cli_flags.format.unwrap_or(config.explain.format),
        sql: cli_flags.sql,
        logging_guard,
    })
}

/// An explicit path must exist; the default path may be missing.
fn load_config(
    explicit: Option<&str>,
    default_path: impl AsRef<Path>,
) -> Result<(AppConfig, Option<String>), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(path) = explicit {
        return Ok((AppConfig::load_required(path)?, Some(path.to_string())));
    }
    let default_path = default_path.as_ref();
    Ok(match AppConfig::load_optional(default_path)? {
        Some(cfg) => (cfg, Some(default_path.display().to_string())),
        None => (AppConfig::default(), None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("velo_window_bootstrap.{}.{}.yaml", name, nanos))
    }

    fn parse(args: &[&str]) -> Result<CliFlags, String> {
        CliFlags::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn trailing_words_form_the_sql() {
        let flags = parse(&["--format", "json", "SELECT", "COUNT(*)", "FROM", "t"]).unwrap();
        assert_eq!(flags.format, Some(ExplainFormat::Json));
        assert_eq!(flags.sql.as_deref(), Some("SELECT COUNT(*) FROM t"));
        assert!(flags.config_path.is_none());
    }

    #[test]
    fn sql_flag_wins_over_trailing_text() {
        let flags = parse(&["--config", "cfg.yaml", "--sql", "SELECT 1", "ignored"]).unwrap();
        assert_eq!(flags.config_path.as_deref(), Some("cfg.yaml"));
        assert_eq!(flags.sql.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn rejects_missing_flag_values() {
        assert_eq!(parse(&["--config"]).unwrap_err(), "--config requires a path");
        assert!(parse(&["--format", "yaml"]).unwrap_err().contains("unknown explain format"));
    }

    #[test]
    fn default_config_is_optional() {
        let missing = temp_path("missing");
        let (cfg, loaded) = load_config(None, &missing).unwrap();
        assert!(loaded.is_none());
        assert_eq!(cfg.explain.format, ExplainFormat::Topology);

        let present = temp_path("present");
        std::fs::write(&present, "explain:\n  format: json\n").unwrap();
        let (cfg, loaded) = load_config(None, &present).unwrap();
        assert_eq!(cfg.explain.format, ExplainFormat::Json);
        assert_eq!(loaded, Some(present.display().to_string()));

        let explicit = missing.display().to_string();
        assert!(load_config(Some(explicit.as_str()), &present).is_err());
        let _ = std::fs::remove_file(&present);
    }
}
