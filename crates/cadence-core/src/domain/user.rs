use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{ArtistId, FavoriteId, MusicId, PlaylistId, UserId};

/// Usuario de la aplicación.
///
/// Las listas de referencias están desnormalizadas: cada una debe reflejar
/// exactamente las relaciones que existen en las colecciones de favoritos,
/// playlists, música y artistas. Solo el coordinador las modifica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: UserId,
  pub display_name: String,
  pub email: String,

  /// Favoritos del usuario (ids de `Favorite`, no de `Music`).
  #[serde(default)]
  pub favorites: Vec<FavoriteId>,

  #[serde(default)]
  pub playlists: Vec<PlaylistId>,

  #[serde(default)]
  pub uploaded_music: Vec<MusicId>,

  #[serde(default)]
  pub followed_artists: Vec<ArtistId>,

  #[serde(default)]
  pub followers: Vec<UserId>,

  /// Contador de subidas. Se actualiza en modo "best effort", así que puede
  /// quedar por detrás de `uploaded_music`.
  #[serde(default)]
  pub upload_count: u32,

  pub created_at: DateTime<Utc>,
}

impl User {
  pub const FAVORITES: &'static str = "favorites";
  pub const PLAYLISTS: &'static str = "playlists";
  pub const UPLOADED_MUSIC: &'static str = "uploadedMusic";
  pub const FOLLOWED_ARTISTS: &'static str = "followedArtists";
  pub const FOLLOWERS: &'static str = "followers";
  pub const UPLOAD_COUNT: &'static str = "uploadCount";

  pub fn new(id: UserId, display_name: impl Into<String>, email: impl Into<String>) -> Self {
    User {
      id,
      display_name: display_name.into(),
      email: email.into(),
      favorites: Vec::new(),
      playlists: Vec::new(),
      uploaded_music: Vec::new(),
      followed_artists: Vec::new(),
      followers: Vec::new(),
      upload_count: 0,
      created_at: Utc::now(),
    }
  }
}

impl Document for User {
  const COLLECTION: Collection = Collection::Users;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}
