//! Predicados de pertenencia sobre entidades ya cargadas.
//!
//! Sin I/O ni errores: solo consultan las listas de referencias, las mismas
//! que mantiene el coordinador en cada flujo.

use crate::domain::artist::Artist;
use crate::domain::favorite::Favorite;
use crate::domain::ids::{ArtistId, FavoriteId, MusicId, PlaylistId, UserId};
use crate::domain::music::Music;
use crate::domain::playlist::Playlist;
use crate::domain::user::User;

impl User {
  pub fn has_favorite(&self, favorite_id: &FavoriteId) -> bool {
    self.favorites.contains(favorite_id)
  }

  pub fn is_following(&self, artist_id: &ArtistId) -> bool {
    self.followed_artists.contains(artist_id)
  }

  pub fn owns_playlist(&self, playlist_id: &PlaylistId) -> bool {
    self.playlists.contains(playlist_id)
  }

  pub fn has_uploaded_music(&self, music_id: &MusicId) -> bool {
    self.uploaded_music.contains(music_id)
  }
}

impl Playlist {
  pub fn contains_music(&self, music_id: &MusicId) -> bool {
    self.music_ids.contains(music_id)
  }

  pub fn is_owned_by(&self, user_id: &UserId) -> bool {
    &self.user_id == user_id
  }
}

impl Artist {
  pub fn has_follower(&self, user_id: &UserId) -> bool {
    self.followers.contains(user_id)
  }
}

impl Favorite {
  pub fn belongs_to(&self, user_id: &UserId) -> bool {
    &self.user_id == user_id
  }
}

impl Music {
  pub fn is_uploaded_by(&self, user_id: &UserId) -> bool {
    &self.uploaded_by == user_id
  }
}
