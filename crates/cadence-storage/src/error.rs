use cadence_config::ConfigError;
use cadence_core::domain::Collection;
use cadence_core::ports::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("document {}/{id} not found", .collection.as_str())]
  NotFound { collection: Collection, id: String },
  #[error("document {}/{id} already exists", .collection.as_str())]
  AlreadyExists { collection: Collection, id: String },
  #[error("invalid {} document: {source}", .collection.as_str())]
  Codec {
    collection: Collection,
    #[source]
    source: serde_json::Error,
  },
  #[error("{0}")]
  Rejected(#[from] StoreError),
  #[error("database error: {0}")]
  Database(#[from] diesel::result::Error),
  #[error("connection pool error: {0}")]
  Pool(#[from] diesel::r2d2::PoolError),
  #[error("migration error: {0}")]
  Migration(String),
  #[error("invalid storage config: {0}")]
  InvalidConfig(String),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("config error: {0}")]
  Config(#[from] ConfigError),
  #[error("storage task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

impl From<StorageError> for StoreError {
  fn from(err: StorageError) -> Self {
    match err {
      StorageError::NotFound { collection, id } => StoreError::not_found(collection, &id),
      StorageError::Rejected(inner) => inner,
      other => StoreError::new(other.to_string()),
    }
  }
}
