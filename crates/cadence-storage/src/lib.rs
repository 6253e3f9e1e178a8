pub mod config;
mod document;
pub mod error;
pub mod memory;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use config::{StorageBackend, StorageConfig};
pub use error::StorageError;
pub use memory::{MemoryCollection, MemoryStore};
pub use sqlite::{SqliteCollection, SqliteStore};

use cadence_core::ports::Collections;
use tracing::info;

/// Abre los almacenes de todas las colecciones según `[storage]`.
pub fn open_collections(cfg: &StorageConfig) -> Result<Collections, StorageError> {
  match cfg.backend {
    StorageBackend::Memory => {
      info!("using in-memory storage, nothing will be persisted");
      Ok(MemoryStore::new().collections())
    }
    StorageBackend::Sqlite => {
      let path = cfg
        .db_path
        .as_deref()
        .ok_or_else(|| StorageError::InvalidConfig("storage.db_path is not set".to_string()))?;
      Ok(SqliteStore::open(path, cfg)?.collections())
    }
  }
}
