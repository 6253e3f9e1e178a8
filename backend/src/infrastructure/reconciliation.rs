use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::ports::{ReconciliationEvent, ReconciliationSink};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::error;

use crate::config::{ReconciliationConfig, SinkKind};

/// Reports each event as an `error!` on the `cadence::reconciliation` target.
#[derive(Debug, Clone, Default)]
pub struct TracingReconciliationSink;

#[async_trait]
impl ReconciliationSink for TracingReconciliationSink {
  async fn record(&self, event: ReconciliationEvent) {
    error!(
      target: "cadence::reconciliation",
      workflow = %event.workflow,
      collection = event.collection.as_str(),
      record_id = %event.record_id,
      action = ?event.action,
      reason = %event.reason,
      "reconciliation needed"
    );
  }
}

/// Appends one JSON object per line to a file that an out-of-band sweep
/// can replay. Write failures fall back to the log; they never reach the
/// workflow that produced the event.
#[derive(Debug)]
pub struct JsonlReconciliationSink {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl JsonlReconciliationSink {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), write_lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  async fn append(&self, event: &ReconciliationEvent) -> anyhow::Result<()> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');

    let _guard = self.write_lock.lock().await;
    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new().create(true).append(true).open(&self.path).await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
  }
}

#[async_trait]
impl ReconciliationSink for JsonlReconciliationSink {
  async fn record(&self, event: ReconciliationEvent) {
    if let Err(err) = self.append(&event).await {
      error!(path = %self.path.display(), error = %err, "could not persist reconciliation event");
      TracingReconciliationSink.record(event).await;
    }
  }
}

pub fn sink_from_config(cfg: &ReconciliationConfig) -> Arc<dyn ReconciliationSink> {
  match (cfg.sink, &cfg.file) {
    (SinkKind::File, Some(path)) => Arc::new(JsonlReconciliationSink::new(path.clone())),
    (SinkKind::File, None) => {
      error!("reconciliation sink set to file without a path, using the log");
      Arc::new(TracingReconciliationSink)
    }
    (SinkKind::Log, _) => Arc::new(TracingReconciliationSink),
  }
}
