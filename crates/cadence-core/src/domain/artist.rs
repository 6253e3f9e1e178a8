use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{ArtistId, MusicId, UserId};

/// Representa a un artista dentro del sistema.
///
/// Además del perfil público guarda dos listas desnormalizadas: su música y
/// los usuarios que lo siguen. La segunda debe coincidir con las aristas
/// `UserFollowArtist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
  pub id: ArtistId,

  /// Nombre principal (canónico) del artista.
  pub name: String,

  #[serde(default)]
  pub bio: Option<String>,

  /// Enlaces relevantes: páginas oficiales, redes, etc.
  #[serde(default)]
  pub sites: Vec<String>,

  #[serde(default)]
  pub music_ids: Vec<MusicId>,

  #[serde(default)]
  pub followers: Vec<UserId>,
}

impl Artist {
  pub const MUSIC_IDS: &'static str = "musicIds";
  pub const FOLLOWERS: &'static str = "followers";

  pub fn new(id: ArtistId, name: impl Into<String>) -> Self {
    Artist { id, name: name.into(), bio: None, sites: Vec::new(), music_ids: Vec::new(), followers: Vec::new() }
  }
}

impl Document for Artist {
  const COLLECTION: Collection = Collection::Artists;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}
