use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Artist, Favorite, Music, Playlist, User, UserId};
use crate::ports::{Collections, Filter, StoreError};

/// Relaciones que se cargan junto al usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
  Favorites,
  Playlists,
  Uploads,
  FollowedArtists,
}

/// Vista compuesta de un usuario y sus relaciones.
///
/// Si una lectura dependiente falla su lista queda vacía y la relación
/// aparece en `degraded`: significa "no se pudo verificar", no "no existe".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub user: User,
  pub favorites: Vec<Favorite>,
  pub playlists: Vec<Playlist>,
  pub uploads: Vec<Music>,
  pub followed_artists: Vec<Artist>,
  pub degraded: Vec<Relation>,
}

impl UserProfile {
  pub fn is_complete(&self) -> bool {
    self.degraded.is_empty()
  }
}

pub struct ProfileComposer<'a> {
  stores: &'a Collections,
}

impl<'a> ProfileComposer<'a> {
  pub fn new(stores: &'a Collections) -> Self {
    Self { stores }
  }

  pub async fn compose(&self, user_id: &UserId) -> Option<UserProfile> {
    let user = match self.stores.users.get(user_id.as_str()).await {
      Ok(Some(user)) => user,
      Ok(None) => {
        debug!(user_id = %user_id, "user not found, no profile");
        return None;
      }
      Err(err) => {
        warn!(user_id = %user_id, error = %err, "could not read user, no profile");
        return None;
      }
    };

    let owner = user_id.as_str();
    let by_favorite_owner = Filter::eq(Favorite::USER_ID, owner);
    let by_playlist_owner = Filter::eq(Playlist::USER_ID, owner);
    let by_uploader = Filter::eq(Music::UPLOADED_BY, owner);
    let (favorites, playlists, uploads, followed_artists) = futures::join!(
      self.stores.favorites.list(&by_favorite_owner),
      self.stores.playlists.list(&by_playlist_owner),
      self.stores.music.list(&by_uploader),
      self.followed_artists(&user),
    );

    let mut degraded = Vec::new();
    let favorites = settle(user_id, Relation::Favorites, favorites, &mut degraded);
    let playlists = settle(user_id, Relation::Playlists, playlists, &mut degraded);
    let uploads = settle(user_id, Relation::Uploads, uploads, &mut degraded);
    let followed_artists = settle(user_id, Relation::FollowedArtists, followed_artists, &mut degraded);

    Some(UserProfile { user, favorites, playlists, uploads, followed_artists, degraded })
  }

  /// Artistas referenciados por el usuario; los que ya no existen se omiten.
  async fn followed_artists(&self, user: &User) -> Result<Vec<Artist>, StoreError> {
    let reads = user.followed_artists.iter().map(|id| self.stores.artists.get(id.as_str()));

    let mut artists = Vec::with_capacity(user.followed_artists.len());
    for read in join_all(reads).await {
      if let Some(artist) = read? {
        artists.push(artist);
      }
    }
    Ok(artists)
  }
}

fn settle<T>(
  user_id: &UserId,
  relation: Relation,
  result: Result<Vec<T>, StoreError>,
  degraded: &mut Vec<Relation>,
) -> Vec<T> {
  match result {
    Ok(items) => items,
    Err(err) => {
      warn!(user_id = %user_id, ?relation, error = %err, "dependent read failed, relation left empty");
      degraded.push(relation);
      Vec::new()
    }
  }
}
