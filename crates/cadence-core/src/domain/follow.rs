use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{ArtistId, FollowId, UserId};

/// Arista explícita usuario ↔ artista.
///
/// Solo existe si el artista está en `User::followed_artists` y el usuario en
/// `Artist::followers`; por eso el coordinador la crea en último lugar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFollowArtist {
  pub id: FollowId,
  pub user_id: UserId,
  pub artist_id: ArtistId,
  pub followed_at: DateTime<Utc>,

  #[serde(default = "default_notifications")]
  pub notifications_enabled: bool,
}

fn default_notifications() -> bool {
  true
}

impl UserFollowArtist {
  pub const USER_ID: &'static str = "userId";
  pub const ARTIST_ID: &'static str = "artistId";
}

impl Document for UserFollowArtist {
  const COLLECTION: Collection = Collection::Follows;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}
