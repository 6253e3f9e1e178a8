use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the configured filter. Fails if a subscriber is
/// already installed (e.g. called twice in one process).
pub fn init_tracing(cfg: &LoggingConfig) -> anyhow::Result<()> {
  let filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(&cfg.filter).with_context(|| format!("invalid log filter `{}`", cfg.filter))?,
  };

  let (full, compact) = match cfg.format {
    LogFormat::Full => (Some(fmt::layer()), None),
    LogFormat::Compact => (None, Some(fmt::layer().compact())),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(full)
    .with(compact)
    .try_init()
    .context("tracing subscriber already installed")
}
