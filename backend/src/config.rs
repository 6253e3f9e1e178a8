use cadence_config::{ConfigBackend, ConfigError, TomlConfigBackend, config_backend};
use cadence_core::CoordinatorOptions;
use cadence_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Full,
  Compact,
}

/// `[logging]`: `RUST_LOG` still wins over `filter` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  pub filter: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    LoggingConfig { filter: "info".to_string(), format: LogFormat::Full }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
  #[default]
  Log,
  File,
}

/// `[reconciliation]`: where failed compensations are reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
  pub sink: SinkKind,
  /// JSON lines file; defaults to `<data_dir>/reconciliation.jsonl`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub file: Option<PathBuf>,
}

/// Every section the application reads from `cadence.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub storage: StorageConfig,
  pub coordinator: CoordinatorOptions,
  pub logging: LoggingConfig,
  pub reconciliation: ReconciliationConfig,
}

impl AppConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  /// Loads each section with defaults and writes the resolved values back,
  /// so a fresh install ends up with a complete, editable file.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let storage = StorageConfig::load_from(backend)?;

    let coordinator: CoordinatorOptions = backend.load_section_with_default("coordinator")?;
    backend.save_section("coordinator", &coordinator)?;

    let logging: LoggingConfig = backend.load_section_with_default("logging")?;
    backend.save_section("logging", &logging)?;

    let mut reconciliation: ReconciliationConfig = backend.load_section_with_default("reconciliation")?;
    if reconciliation.file.is_none() {
      reconciliation.file = Some(backend.paths().data_dir.join("reconciliation.jsonl"));
    }
    backend.save_section("reconciliation", &reconciliation)?;

    Ok(AppConfig { storage, coordinator, logging, reconciliation })
  }
}
