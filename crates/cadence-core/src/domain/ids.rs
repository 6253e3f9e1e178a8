use serde::{Deserialize, Serialize};
use std::fmt;

/// Declara un identificador de documento como newtype sobre `String`.
///
/// Los ids los genera el coordinador (ver `services::id_generator`) o los
/// asigna el backend; aquí solo se transportan, nunca se interpretan.
macro_rules! document_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub fn new(value: impl Into<String>) -> Self {
        $name(value.into())
      }

      pub fn as_str(&self) -> &str {
        &self.0
      }

      pub fn into_string(self) -> String {
        self.0
      }
    }

    impl From<String> for $name {
      fn from(value: String) -> Self {
        $name(value)
      }
    }

    impl From<&str> for $name {
      fn from(value: &str) -> Self {
        $name(value.to_owned())
      }
    }

    impl From<$name> for String {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl AsRef<str> for $name {
      fn as_ref(&self) -> &str {
        &self.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }
  };
}

document_id!(
  /// Identificador de un usuario.
  UserId
);

document_id!(
  /// Identificador de una arista usuario ↔ música (favorito).
  FavoriteId
);

document_id!(
  /// Identificador de una playlist.
  PlaylistId
);

document_id!(
  /// Identificador de un artista.
  ArtistId
);

document_id!(
  /// Identificador de una pista subida (`Music`).
  MusicId
);

document_id!(
  /// Identificador de la arista explícita usuario ↔ artista.
  FollowId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_serialize_as_plain_strings() {
    let id = FavoriteId::new("fav_1_abcd");
    assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("fav_1_abcd"));

    let back: FavoriteId = serde_json::from_str("\"fav_1_abcd\"").unwrap();
    assert_eq!(back, id);
  }

  #[test]
  fn display_matches_inner_value() {
    assert_eq!(UserId::from("u1").to_string(), "u1");
    assert_eq!(String::from(MusicId::from("m1")), "m1");
  }
}
