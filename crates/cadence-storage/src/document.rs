//! Conversión entre registros del dominio y su forma JSON almacenada.

use cadence_core::domain::Document;
use serde_json::Value;

use crate::error::StorageError;

pub(crate) fn to_value<D: Document>(record: &D) -> Result<Value, StorageError> {
  serde_json::to_value(record).map_err(|source| StorageError::Codec { collection: D::COLLECTION, source })
}

pub(crate) fn from_value<D: Document>(value: Value) -> Result<D, StorageError> {
  serde_json::from_value(value).map_err(|source| StorageError::Codec { collection: D::COLLECTION, source })
}

pub(crate) fn from_str<D: Document>(body: &str) -> Result<Value, StorageError> {
  serde_json::from_str(body).map_err(|source| StorageError::Codec { collection: D::COLLECTION, source })
}
