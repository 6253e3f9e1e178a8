use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Collection;

/// Cómo intentaba deshacer el coordinador una escritura ya aplicada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationAction {
  /// Borrar el registro principal creado.
  Delete,
  /// Volver a crear un registro borrado a partir de su copia.
  Recreate,
  /// Revertir un cambio de campos (p. ej. quitar un id de una lista).
  RevertUpdate,
}

/// Una compensación falló y dejó datos huérfanos: hace falta una
/// reconciliación fuera de banda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationEvent {
  pub workflow: String,
  pub collection: Collection,
  pub record_id: String,
  pub action: CompensationAction,
  pub reason: String,
  pub occurred_at: DateTime<Utc>,
}

impl ReconciliationEvent {
  pub fn new(
    workflow: &str,
    collection: Collection,
    record_id: &str,
    action: CompensationAction,
    reason: impl Into<String>,
  ) -> Self {
    ReconciliationEvent {
      workflow: workflow.to_owned(),
      collection,
      record_id: record_id.to_owned(),
      action,
      reason: reason.into(),
      occurred_at: Utc::now(),
    }
  }
}

/// Port de salida para eventos de reconciliación.
///
/// Se llama sin bloquear ni hacer fallar el flujo original; la
/// implementación decide a dónde van (logs, archivo, cola...).
#[async_trait]
pub trait ReconciliationSink: Send + Sync {
  async fn record(&self, event: ReconciliationEvent);
}

#[async_trait]
impl<T: ReconciliationSink + ?Sized> ReconciliationSink for Arc<T> {
  async fn record(&self, event: ReconciliationEvent) {
    (**self).record(event).await
  }
}
