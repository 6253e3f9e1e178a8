pub mod config;
mod handle;
pub mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use cadence_core::ports::Collections;
use tokio::runtime::Handle;
use tracing::info;

pub use crate::config::AppConfig;
pub use crate::handle::{Coordinator, CoordinatorHandle, SharedSink};
use crate::infrastructure::reconciliation::sink_from_config;

/// Wires stores, reconciliation sink and coordinator from configuration.
///
/// Must be called from inside a tokio runtime; the returned handle spawns
/// workflows on that runtime.
pub fn build(config: &AppConfig) -> anyhow::Result<CoordinatorHandle> {
  let stores = cadence_storage::open_collections(&config.storage).context("could not open storage")?;
  let runtime = Handle::try_current().context("cadence must be built inside a tokio runtime")?;
  Ok(build_with(stores, config, runtime))
}

/// Same as [`build`] over already opened stores.
pub fn build_with(stores: Collections, config: &AppConfig, runtime: Handle) -> CoordinatorHandle {
  // --- Dependency Injection Phase ---

  // 1. Output port for failed compensations (log or JSON lines file).
  let sink = sink_from_config(&config.reconciliation);

  // 2. Core service over the collection stores.
  let coordinator = Coordinator::with_options(stores, sink, config.coordinator.clone());

  info!(
    backend = ?config.storage.backend,
    id_scheme = ?config.coordinator.id_scheme,
    serialize_per_owner = config.coordinator.serialize_per_owner,
    "coordinator ready"
  );

  // 3. UI-facing surface.
  CoordinatorHandle::new(Arc::new(coordinator), runtime)
}

/// Loads `cadence.toml`, installs logging and builds the coordinator.
pub fn run() -> anyhow::Result<CoordinatorHandle> {
  let config = AppConfig::load().context("could not load cadence.toml")?;
  infrastructure::logging::init_tracing(&config.logging)?;
  build(&config)
}
