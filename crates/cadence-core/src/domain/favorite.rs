use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{FavoriteId, MusicId, UserId};
use crate::domain::rating::Rating;

/// Arista de la relación muchos-a-muchos usuario ↔ música.
///
/// Su id debe aparecer en `User::favorites` del dueño y viceversa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
  pub id: FavoriteId,
  pub user_id: UserId,
  pub music_id: MusicId,
  pub created_at: DateTime<Utc>,

  #[serde(default)]
  pub play_count: u32,

  #[serde(default)]
  pub rating: Option<Rating>,

  #[serde(default)]
  pub notes: Option<String>,
}

impl Favorite {
  pub const USER_ID: &'static str = "userId";
  pub const MUSIC_ID: &'static str = "musicId";

  pub fn new(id: FavoriteId, user_id: UserId, music_id: MusicId, created_at: DateTime<Utc>) -> Self {
    Favorite { id, user_id, music_id, created_at, play_count: 0, rating: None, notes: None }
  }
}

impl Document for Favorite {
  const COLLECTION: Collection = Collection::Favorites;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}
