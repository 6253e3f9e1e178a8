use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colecciones independientes del backend.
///
/// Cada una vive en su propio almacén; ninguna operación las toca de forma
/// atómica, por eso la coherencia entre ellas es responsabilidad del
/// coordinador de relaciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
  Users,
  Favorites,
  Playlists,
  Artists,
  Music,
  Follows,
}

impl Collection {
  /// Nombre de la colección en el almacén.
  pub fn as_str(&self) -> &'static str {
    match self {
      Collection::Users => "users",
      Collection::Favorites => "favorites",
      Collection::Playlists => "playlists",
      Collection::Artists => "artists",
      Collection::Music => "music",
      Collection::Follows => "follows",
    }
  }

  /// Prefijo usado al generar identificadores de documentos de esta colección.
  pub fn id_prefix(&self) -> &'static str {
    match self {
      Collection::Users => "user",
      Collection::Favorites => "fav",
      Collection::Playlists => "playlist",
      Collection::Artists => "artist",
      Collection::Music => "music",
      Collection::Follows => "follow",
    }
  }
}

/// Se muestra en singular porque acaba en mensajes para el usuario
/// ("Could not save favorite: ...").
impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Collection::Users => "user",
      Collection::Favorites => "favorite",
      Collection::Playlists => "playlist",
      Collection::Artists => "artist",
      Collection::Music => "music track",
      Collection::Follows => "follow",
    };
    f.write_str(label)
  }
}

/// Un registro que se guarda como documento en una colección.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
  const COLLECTION: Collection;

  fn document_id(&self) -> &str;
}
