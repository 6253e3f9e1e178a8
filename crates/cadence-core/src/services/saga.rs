//! Escritura en varias fases con compensación.
//!
//! Un `Saga` es una lista ordenada de pasos. Cada paso escribe en una sola
//! colección y puede declarar cómo deshacerse. Reglas de ejecución:
//!
//! - los pasos corren estrictamente en orden, cada uno espera al anterior;
//! - el primer paso `Gating` que falla detiene el flujo y se compensan, en
//!   orden inverso, todos los pasos ya aplicados que tengan compensación;
//! - un paso `BestEffort` que falla solo se registra en el log;
//! - el resultado de una compensación nunca llega a quien llamó: si falla se
//!   emite un `ReconciliationEvent`.

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, warn};

use crate::domain::{Collection, Document};
use crate::errors::WorkflowError;
use crate::ports::{CollectionStore, CompensationAction, FieldChanges, ReconciliationEvent, ReconciliationSink, StoreError};

pub type StepFuture<'a> = BoxFuture<'a, Result<(), StoreError>>;

type StepAction<'a> = Box<dyn FnOnce() -> StepFuture<'a> + Send + 'a>;

fn boxed_action<'a, F, Fut>(f: F) -> StepAction<'a>
where
  F: FnOnce() -> Fut + Send + 'a,
  Fut: Future<Output = Result<(), StoreError>> + Send + 'a,
{
  Box::new(move || f().boxed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
  /// Su fallo detiene el flujo y dispara las compensaciones.
  Gating,
  /// Su fallo se registra y el flujo sigue.
  BestEffort,
}

/// Operación inversa de un paso ya aplicado.
pub struct Compensation<'a> {
  action: CompensationAction,
  run: StepAction<'a>,
}

impl<'a> Compensation<'a> {
  pub fn new<F, Fut>(action: CompensationAction, f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = Result<(), StoreError>> + Send + 'a,
  {
    Compensation { action, run: boxed_action(f) }
  }

  pub fn delete<D: Document>(store: &'a dyn CollectionStore<D>, id: impl Into<String>) -> Self {
    let id = id.into();
    Self::new(CompensationAction::Delete, move || async move { store.delete(&id).await })
  }

  pub fn revert<D: Document>(store: &'a dyn CollectionStore<D>, id: impl Into<String>, changes: FieldChanges) -> Self {
    let id = id.into();
    Self::new(CompensationAction::RevertUpdate, move || async move { store.update(&id, changes).await })
  }

  pub fn recreate<D: Document>(store: &'a dyn CollectionStore<D>, snapshot: D) -> Self {
    Self::new(CompensationAction::Recreate, move || async move { store.create(snapshot).await.map(|_| ()) })
  }
}

pub struct Step<'a> {
  name: &'static str,
  collection: Collection,
  record_id: String,
  kind: StepKind,
  run: StepAction<'a>,
  compensation: Option<Compensation<'a>>,
}

impl<'a> Step<'a> {
  pub fn new<F, Fut>(name: &'static str, kind: StepKind, collection: Collection, record_id: impl Into<String>, f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = Result<(), StoreError>> + Send + 'a,
  {
    Step { name, collection, record_id: record_id.into(), kind, run: boxed_action(f), compensation: None }
  }

  pub fn create<D: Document>(name: &'static str, store: &'a dyn CollectionStore<D>, record: D) -> Self {
    let id = record.document_id().to_owned();
    Self::new(name, StepKind::Gating, D::COLLECTION, id, move || async move { store.create(record).await.map(|_| ()) })
  }

  pub fn update<D: Document>(
    name: &'static str,
    store: &'a dyn CollectionStore<D>,
    id: impl Into<String>,
    changes: FieldChanges,
  ) -> Self {
    let id = id.into();
    let record_id = id.clone();
    Self::new(name, StepKind::Gating, D::COLLECTION, record_id, move || async move { store.update(&id, changes).await })
  }

  pub fn delete<D: Document>(name: &'static str, store: &'a dyn CollectionStore<D>, id: impl Into<String>) -> Self {
    let id = id.into();
    let record_id = id.clone();
    Self::new(name, StepKind::Gating, D::COLLECTION, record_id, move || async move { store.delete(&id).await })
  }

  /// Marca el paso como no bloqueante.
  pub fn best_effort(mut self) -> Self {
    self.kind = StepKind::BestEffort;
    self
  }

  pub fn compensate_with(mut self, compensation: Compensation<'a>) -> Self {
    self.compensation = Some(compensation);
    self
  }
}

/// Paso ya aplicado que sabe deshacerse.
struct Applied<'a> {
  step: &'static str,
  collection: Collection,
  record_id: String,
  compensation: Compensation<'a>,
}

pub struct Saga<'a> {
  workflow: &'static str,
  steps: Vec<Step<'a>>,
}

impl<'a> Saga<'a> {
  pub fn new(workflow: &'static str) -> Self {
    Saga { workflow, steps: Vec::new() }
  }

  pub fn step(mut self, step: Step<'a>) -> Self {
    self.steps.push(step);
    self
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Ejecuta los pasos en orden.
  ///
  /// Si el primer paso bloqueante falla el error es `PrimaryWrite` (no hay
  /// nada que compensar); si falla uno posterior es `SecondaryWrite` y las
  /// compensaciones ya se ejecutaron al volver.
  pub async fn run<R>(self, sink: &R) -> Result<(), WorkflowError>
  where
    R: ReconciliationSink + ?Sized,
  {
    let workflow = self.workflow;
    let mut applied: Vec<Applied<'a>> = Vec::new();
    let mut gating_done = 0usize;

    for step in self.steps {
      let Step { name, collection, record_id, kind, run, compensation } = step;
      debug!(workflow, step = name, collection = collection.as_str(), record_id = %record_id, "running step");

      match run().await {
        Ok(()) => {
          if kind == StepKind::Gating {
            gating_done += 1;
          }
          if let Some(compensation) = compensation {
            applied.push(Applied { step: name, collection, record_id, compensation });
          }
        }
        Err(err) if kind == StepKind::BestEffort => {
          warn!(
            workflow,
            step = name,
            collection = collection.as_str(),
            record_id = %record_id,
            error = %err,
            "best-effort step failed, continuing"
          );
        }
        Err(err) => {
          warn!(
            workflow,
            step = name,
            collection = collection.as_str(),
            record_id = %record_id,
            error = %err,
            compensations = applied.len(),
            "step failed"
          );

          compensate(workflow, applied, sink).await;

          let message = err.message().to_owned();
          return Err(if gating_done == 0 {
            WorkflowError::PrimaryWrite { collection, message }
          } else {
            WorkflowError::SecondaryWrite { collection, message }
          });
        }
      }
    }

    Ok(())
  }
}

async fn compensate<R>(workflow: &'static str, applied: Vec<Applied<'_>>, sink: &R)
where
  R: ReconciliationSink + ?Sized,
{
  for Applied { step, collection, record_id, compensation } in applied.into_iter().rev() {
    let action = compensation.action;

    match (compensation.run)().await {
      Ok(()) => {
        debug!(workflow, step, collection = collection.as_str(), record_id = %record_id, ?action, "compensation applied");
      }
      Err(err) => {
        error!(
          workflow,
          step,
          collection = collection.as_str(),
          record_id = %record_id,
          ?action,
          error = %err,
          "compensation failed, reconciliation needed"
        );
        sink.record(ReconciliationEvent::new(workflow, collection, &record_id, action, err.message())).await;
      }
    }
  }
}
