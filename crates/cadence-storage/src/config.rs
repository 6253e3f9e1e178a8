use cadence_config::{ConfigBackend, ConfigError, TomlConfigBackend, config_backend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const SECTION: &str = "storage";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
  #[default]
  Sqlite,
  Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
  pub backend: StorageBackend,
  /// Sin valor se usa `<data_dir>/cadence.db`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub db_path: Option<PathBuf>,
  pub journal_mode: Option<String>,
  pub pool_size: u32,
  pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
  fn default() -> Self {
    StorageConfig {
      backend: StorageBackend::Sqlite,
      db_path: None,
      journal_mode: Some("WAL".to_string()),
      pool_size: 4,
      busy_timeout_ms: 5_000,
    }
  }
}

impl StorageConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  /// Lee `[storage]`, completa la ruta de la base y escribe de vuelta los
  /// valores resueltos.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let mut cfg: StorageConfig = backend.load_section_with_default(SECTION)?;
    if cfg.db_path.is_none() {
      cfg.db_path = Some(backend.paths().data_dir.join("cadence.db"));
    }
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    config_backend()?.save_section(SECTION, self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cadence_config::CadencePaths;
  use tempfile::tempdir;

  #[test]
  fn defaults_are_resolved_and_written_back() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(CadencePaths::from_base(tmp.path()).unwrap());

    let cfg = StorageConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.backend, StorageBackend::Sqlite);
    assert_eq!(cfg.db_path, Some(tmp.path().join("data").join("cadence.db")));

    let persisted: StorageConfig = backend.load_section(SECTION).unwrap();
    assert_eq!(persisted, cfg);
  }

  #[test]
  fn partial_section_keeps_explicit_values() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(CadencePaths::from_base(tmp.path()).unwrap());
    std::fs::write(backend.paths().config_file(), "[storage]\nbackend = \"memory\"\npool_size = 1\n").unwrap();

    let cfg = StorageConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.backend, StorageBackend::Memory);
    assert_eq!(cfg.pool_size, 1);
    assert_eq!(cfg.journal_mode.as_deref(), Some("WAL"));
  }
}
