use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Tabla de candados asíncronos por dueño (id de usuario).
///
/// Serializa los flujos que tocan las listas del mismo usuario; dueños
/// distintos nunca compiten. Las entradas se liberan solas cuando nadie
/// sostiene ni espera el candado.
#[derive(Debug, Default)]
pub struct OwnerLocks {
  slots: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl OwnerLocks {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
    let slot = {
      let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
      slots.retain(|_, weak| weak.strong_count() > 0);

      match slots.get(owner).and_then(Weak::upgrade) {
        Some(slot) => slot,
        None => {
          let slot = Arc::new(AsyncMutex::new(()));
          slots.insert(owner.to_owned(), Arc::downgrade(&slot));
          slot
        }
      }
    };

    slot.lock_owned().await
  }

  /// Dueños con el candado tomado o con alguien esperando.
  pub fn active(&self) -> usize {
    let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
    slots.values().filter(|weak| weak.strong_count() > 0).count()
  }
}
