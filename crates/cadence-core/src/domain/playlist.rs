use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{MusicId, PlaylistId, UserId};

/// Playlist de un usuario. El orden de `music_ids` es el orden de reproducción.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
  pub id: PlaylistId,
  pub user_id: UserId,
  pub name: String,

  #[serde(default)]
  pub description: String,

  #[serde(default)]
  pub music_ids: Vec<MusicId>,

  #[serde(default)]
  pub is_public: bool,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Playlist {
  pub const USER_ID: &'static str = "userId";
  pub const MUSIC_IDS: &'static str = "musicIds";
}

impl Document for Playlist {
  const COLLECTION: Collection = Collection::Playlists;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}
