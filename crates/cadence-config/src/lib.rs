mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use paths::{BASE_DIR_ENV, CadencePaths, ConfigError};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<CadencePaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Rutas del proceso (portable o de sistema), resueltas una sola vez.
pub fn paths() -> Result<&'static CadencePaths, ConfigError> {
  PATHS.get_or_try_init(CadencePaths::detect)
}

/// Backend de configuración compartido sobre `paths()`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| paths().map(|p| TomlConfigBackend::new(p.clone())))
}
