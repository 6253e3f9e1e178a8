use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::{Collection, Document};
use crate::domain::ids::{ArtistId, MusicId, UserId};

/// Pista subida por un usuario.
///
/// `uploaded_by` y `User::uploaded_music` del autor deben ser coherentes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Music {
  pub id: MusicId,
  pub title: String,
  pub artist_name: String,

  #[serde(default)]
  pub artist_id: Option<ArtistId>,

  #[serde(default)]
  pub album: Option<String>,

  #[serde(default)]
  pub genre: String,

  #[serde(default)]
  pub duration_secs: u32,

  /// URL del archivo ya subido; la subida en sí no es asunto de este crate.
  pub file_url: String,

  #[serde(default)]
  pub cover_url: Option<String>,

  pub uploaded_by: UserId,
  pub uploaded_at: DateTime<Utc>,

  #[serde(default)]
  pub play_count: u64,
}

impl Music {
  pub const UPLOADED_BY: &'static str = "uploadedBy";
  pub const PLAY_COUNT: &'static str = "playCount";
}

impl Document for Music {
  const COLLECTION: Collection = Collection::Music;

  fn document_id(&self) -> &str {
    self.id.as_str()
  }
}

/// Datos que aporta quien sube una pista. El coordinador completa el resto
/// (id, autor, fecha) antes de escribirla.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicDraft {
  pub title: String,
  pub artist_name: String,
  #[serde(default)]
  pub artist_id: Option<ArtistId>,
  #[serde(default)]
  pub album: Option<String>,
  #[serde(default)]
  pub genre: String,
  #[serde(default)]
  pub duration_secs: u32,
  pub file_url: String,
  #[serde(default)]
  pub cover_url: Option<String>,
}

impl MusicDraft {
  pub fn into_music(self, id: MusicId, uploaded_by: UserId, uploaded_at: DateTime<Utc>) -> Music {
    Music {
      id,
      title: self.title,
      artist_name: self.artist_name,
      artist_id: self.artist_id,
      album: self.album,
      genre: self.genre,
      duration_secs: self.duration_secs,
      file_url: self.file_url,
      cover_url: self.cover_url,
      uploaded_by,
      uploaded_at,
      play_count: 0,
    }
  }
}
