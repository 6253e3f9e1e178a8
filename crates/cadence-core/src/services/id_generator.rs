use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ArtistId, Collection, FavoriteId, FollowId, MusicId, PlaylistId, UserId};

/// Último componente temporal emitido en este proceso.
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Formato de los ids que genera el coordinador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdScheme {
  /// `<prefijo>_<milisegundos monótonos>_<sufijo aleatorio>`.
  #[default]
  Timestamp,
  /// `<prefijo>_<uuid v4 sin guiones>`.
  Uuid,
}

/// Genera ids de documentos antes de la escritura principal, sin secuencia
/// central. Las colisiones no se comprueban.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
  scheme: IdScheme,
}

impl IdGenerator {
  pub fn new(scheme: IdScheme) -> Self {
    Self { scheme }
  }

  pub fn scheme(&self) -> IdScheme {
    self.scheme
  }

  pub fn next(&self, collection: Collection) -> String {
    let prefix = collection.id_prefix();
    match self.scheme {
      IdScheme::Timestamp => {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{prefix}_{}_{}", next_millis(), &suffix[..8])
      }
      IdScheme::Uuid => format!("{prefix}_{}", Uuid::new_v4().simple()),
    }
  }

  pub fn user_id(&self) -> UserId {
    UserId::new(self.next(Collection::Users))
  }

  pub fn favorite_id(&self) -> FavoriteId {
    FavoriteId::new(self.next(Collection::Favorites))
  }

  pub fn playlist_id(&self) -> PlaylistId {
    PlaylistId::new(self.next(Collection::Playlists))
  }

  pub fn artist_id(&self) -> ArtistId {
    ArtistId::new(self.next(Collection::Artists))
  }

  pub fn music_id(&self) -> MusicId {
    MusicId::new(self.next(Collection::Music))
  }

  pub fn follow_id(&self) -> FollowId {
    FollowId::new(self.next(Collection::Follows))
  }
}

/// Milisegundos desde epoch, estrictamente crecientes dentro del proceso:
/// si el reloj no avanza (o retrocede) se usa el último valor + 1.
fn next_millis() -> u64 {
  let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
  let mut last = LAST_MILLIS.load(Ordering::Acquire);

  loop {
    let candidate = now.max(last + 1);
    match LAST_MILLIS.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => return candidate,
      Err(observed) => last = observed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn millis_of(id: &str) -> u64 {
    id.split('_').nth(1).unwrap().parse().unwrap()
  }

  #[test]
  fn timestamp_ids_have_prefix_time_and_suffix() {
    let id = IdGenerator::default().next(Collection::Favorites);
    let parts: Vec<&str> = id.split('_').collect();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "fav");
    assert!(parts[1].parse::<u64>().is_ok());
    assert_eq!(parts[2].len(), 8);
    assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn time_component_is_strictly_increasing() {
    let ids = IdGenerator::new(IdScheme::Timestamp);
    let mut previous = 0;

    for _ in 0..1_000 {
      let current = millis_of(ids.playlist_id().as_str());
      assert!(current > previous);
      previous = current;
    }
  }

  #[test]
  fn ids_are_unique_across_threads() {
    let handles: Vec<_> = (0..4)
      .map(|_| std::thread::spawn(|| (0..500).map(|_| IdGenerator::default().next(Collection::Music)).collect::<Vec<_>>()))
      .collect();

    let mut seen = HashSet::new();
    for handle in handles {
      for id in handle.join().unwrap() {
        assert!(seen.insert(id));
      }
    }
    assert_eq!(seen.len(), 2_000);
  }

  #[test]
  fn uuid_scheme_uses_prefix_and_simple_uuid() {
    let id = IdGenerator::new(IdScheme::Uuid).follow_id();
    let (prefix, rest) = id.as_str().split_once('_').unwrap();

    assert_eq!(prefix, "follow");
    assert_eq!(rest.len(), 32);
    assert!(Uuid::parse_str(rest).is_ok());
  }
}
