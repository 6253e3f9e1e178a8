use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

use crate::domain::{
  Artist, ArtistId, Collection, Document, Favorite, FavoriteId, FollowId, MusicDraft, MusicId, Playlist, PlaylistId,
  User, UserFollowArtist, UserId,
};
use crate::errors::WorkflowError;
use crate::outcome::Outcome;
use crate::ports::{CollectionStore, Collections, FieldChanges, Filter, ReconciliationSink};
use crate::services::id_generator::{IdGenerator, IdScheme};
use crate::services::owner_locks::OwnerLocks;
use crate::services::profile_composer::{ProfileComposer, UserProfile};
use crate::services::saga::{Compensation, Saga, Step};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorOptions {
  #[serde(default)]
  pub id_scheme: IdScheme,

  /// Ejecutar de uno en uno los flujos que tocan al mismo usuario.
  /// Desactivado, dos flujos concurrentes compiten como en cualquier
  /// cliente sin transacciones.
  #[serde(default)]
  pub serialize_per_owner: bool,
}

/// Coordinador de relaciones.
///
/// Cada flujo compone varias llamadas a almacenes independientes en un
/// `Saga` y devuelve un `Outcome`. No guarda estado de entidades entre
/// llamadas: todo vive en los almacenes.
pub struct RelationshipCoordinator<R>
where
  R: ReconciliationSink,
{
  stores: Collections,
  sink: R,
  ids: IdGenerator,
  locks: Option<OwnerLocks>,
}

impl<R> RelationshipCoordinator<R>
where
  R: ReconciliationSink,
{
  pub fn new(stores: Collections, sink: R) -> Self {
    Self::with_options(stores, sink, CoordinatorOptions::default())
  }

  pub fn with_options(stores: Collections, sink: R, options: CoordinatorOptions) -> Self {
    let locks = options.serialize_per_owner.then(OwnerLocks::new);
    Self { stores, sink, ids: IdGenerator::new(options.id_scheme), locks }
  }

  pub fn stores(&self) -> &Collections {
    &self.stores
  }

  pub fn sink(&self) -> &R {
    &self.sink
  }

  async fn lock_owner(&self, owner: &UserId) -> Option<OwnedMutexGuard<()>> {
    match &self.locks {
      Some(locks) => Some(locks.acquire(owner.as_str()).await),
      None => None,
    }
  }

  // -------- Escrituras --------

  /// Favorito: crea la arista y luego la enlaza en el usuario.
  pub async fn add_music_to_favorites(&self, user_id: &UserId, music_id: &MusicId) -> Outcome<FavoriteId> {
    let _owner = self.lock_owner(user_id).await;

    let favorite_id = self.ids.favorite_id();
    let favorite = Favorite::new(favorite_id.clone(), user_id.clone(), music_id.clone(), Utc::now());
    let favorites = self.stores.favorites.as_ref();

    let saga = Saga::new("add_music_to_favorites")
      .step(
        Step::create("create favorite", favorites, favorite)
          .compensate_with(Compensation::delete(favorites, favorite_id.as_str())),
      )
      .step(Step::update(
        "link favorite to user",
        self.stores.users.as_ref(),
        user_id.as_str(),
        FieldChanges::new().append_unique(User::FAVORITES, favorite_id.as_str()),
      ));

    match saga.run(&self.sink).await {
      Ok(()) => {
        info!(user_id = %user_id, music_id = %music_id, favorite_id = %favorite_id, "music added to favorites");
        Outcome::success("Added to favorites", favorite_id)
      }
      Err(err) => Outcome::failure(err),
    }
  }

  /// Seguir a un artista: lista del usuario, lista del artista y, al final,
  /// la arista explícita. Solo se escriben las partes que faltan; si las tres
  /// ya existen no se escribe nada.
  pub async fn follow_artist(&self, user_id: &UserId, artist_id: &ArtistId) -> Outcome<FollowId> {
    let _owner = self.lock_owner(user_id).await;

    let users = self.stores.users.as_ref();
    let artists = self.stores.artists.as_ref();
    let follows = self.stores.follows.as_ref();

    let (user, artist, edges) = match futures::try_join!(
      load(users, user_id.as_str()),
      load(artists, artist_id.as_str()),
      follow_edges(follows, user_id, artist_id),
    ) {
      Ok(found) => found,
      Err(err) => return Outcome::failure(err),
    };
    let user_linked = user.is_following(artist_id);
    let artist_linked = artist.has_follower(user_id);

    if user_linked && artist_linked && !edges.is_empty() {
      debug!(user_id = %user_id, artist_id = %artist_id, "already following, nothing to do");
      return Outcome::done("Already following this artist");
    }
    if user_linked || artist_linked || !edges.is_empty() {
      debug!(user_id = %user_id, artist_id = %artist_id, user_linked, artist_linked, edges = edges.len(), "repairing partial follow");
    }

    let mut saga = Saga::new("follow_artist");
    if !user_linked {
      saga = saga.step(
        Step::update(
          "add artist to user",
          users,
          user_id.as_str(),
          FieldChanges::new().append_unique(User::FOLLOWED_ARTISTS, artist_id.as_str()),
        )
        .compensate_with(Compensation::revert(
          users,
          user_id.as_str(),
          FieldChanges::new().remove(User::FOLLOWED_ARTISTS, artist_id.as_str()),
        )),
      );
    }
    if !artist_linked {
      saga = saga.step(
        Step::update(
          "add follower to artist",
          artists,
          artist_id.as_str(),
          FieldChanges::new().append_unique(Artist::FOLLOWERS, user_id.as_str()),
        )
        .compensate_with(Compensation::revert(
          artists,
          artist_id.as_str(),
          FieldChanges::new().remove(Artist::FOLLOWERS, user_id.as_str()),
        )),
      );
    }

    let follow_id = match edges.into_iter().next() {
      Some(edge) => edge.id,
      None => {
        let follow_id = self.ids.follow_id();
        let edge = UserFollowArtist {
          id: follow_id.clone(),
          user_id: user_id.clone(),
          artist_id: artist_id.clone(),
          followed_at: Utc::now(),
          notifications_enabled: true,
        };
        saga = saga.step(Step::create("create follow edge", follows, edge));
        follow_id
      }
    };

    match saga.run(&self.sink).await {
      Ok(()) => {
        info!(user_id = %user_id, artist_id = %artist_id, follow_id = %follow_id, "artist followed");
        Outcome::success("Now following artist", follow_id)
      }
      Err(err) => Outcome::failure(err),
    }
  }

  pub async fn create_playlist_with_music(
    &self,
    user_id: &UserId,
    name: &str,
    description: &str,
    music_ids: &[MusicId],
  ) -> Outcome<PlaylistId> {
    let name = name.trim();
    if name.is_empty() {
      return Outcome::failure(WorkflowError::Invalid("Playlist name cannot be empty".into()));
    }

    let _owner = self.lock_owner(user_id).await;

    let now = Utc::now();
    let playlist_id = self.ids.playlist_id();
    let playlist = Playlist {
      id: playlist_id.clone(),
      user_id: user_id.clone(),
      name: name.to_owned(),
      description: description.to_owned(),
      music_ids: music_ids.to_vec(),
      is_public: false,
      created_at: now,
      updated_at: now,
    };
    let playlists = self.stores.playlists.as_ref();

    let saga = Saga::new("create_playlist_with_music")
      .step(
        Step::create("create playlist", playlists, playlist)
          .compensate_with(Compensation::delete(playlists, playlist_id.as_str())),
      )
      .step(Step::update(
        "link playlist to user",
        self.stores.users.as_ref(),
        user_id.as_str(),
        FieldChanges::new().append_unique(User::PLAYLISTS, playlist_id.as_str()),
      ));

    match saga.run(&self.sink).await {
      Ok(()) => {
        info!(user_id = %user_id, playlist_id = %playlist_id, tracks = music_ids.len(), "playlist created");
        Outcome::success("Playlist created", playlist_id)
      }
      Err(err) => Outcome::failure(err),
    }
  }

  /// Registra una pista ya subida. El contador del usuario y la lista del
  /// artista se actualizan sin bloquear el resultado.
  pub async fn upload_music(&self, user_id: &UserId, draft: MusicDraft) -> Outcome<MusicId> {
    if draft.title.trim().is_empty() {
      return Outcome::failure(WorkflowError::Invalid("Track title cannot be empty".into()));
    }

    let _owner = self.lock_owner(user_id).await;

    let music_id = self.ids.music_id();
    let music = draft.into_music(music_id.clone(), user_id.clone(), Utc::now());
    let artist_id = music.artist_id.clone();
    let tracks = self.stores.music.as_ref();
    let users = self.stores.users.as_ref();

    let mut saga = Saga::new("upload_music")
      .step(Step::create("create music", tracks, music).compensate_with(Compensation::delete(tracks, music_id.as_str())))
      .step(Step::update(
        "link upload to user",
        users,
        user_id.as_str(),
        FieldChanges::new().append_unique(User::UPLOADED_MUSIC, music_id.as_str()),
      ))
      .step(
        Step::update("bump upload counter", users, user_id.as_str(), FieldChanges::new().increment(User::UPLOAD_COUNT, 1))
          .best_effort(),
      );

    if let Some(artist_id) = &artist_id {
      saga = saga.step(
        Step::update(
          "link music to artist",
          self.stores.artists.as_ref(),
          artist_id.as_str(),
          FieldChanges::new().append_unique(Artist::MUSIC_IDS, music_id.as_str()),
        )
        .best_effort(),
      );
    }

    match saga.run(&self.sink).await {
      Ok(()) => {
        info!(user_id = %user_id, music_id = %music_id, "music uploaded");
        Outcome::success("Music uploaded", music_id)
      }
      Err(err) => Outcome::failure(err),
    }
  }

  pub async fn remove_music_from_favorites(&self, user_id: &UserId, favorite_id: &FavoriteId) -> Outcome<FavoriteId> {
    let _owner = self.lock_owner(user_id).await;

    let favorites = self.stores.favorites.as_ref();
    let favorite = match load_owned(favorites, favorite_id.as_str(), |f| f.belongs_to(user_id)).await {
      Ok(favorite) => favorite,
      Err(err) => return Outcome::failure(err),
    };

    let saga = Saga::new("remove_music_from_favorites")
      .step(
        Step::delete("delete favorite", favorites, favorite_id.as_str())
          .compensate_with(Compensation::recreate(favorites, favorite)),
      )
      .step(Step::update(
        "unlink favorite from user",
        self.stores.users.as_ref(),
        user_id.as_str(),
        FieldChanges::new().remove(User::FAVORITES, favorite_id.as_str()),
      ));

    match saga.run(&self.sink).await {
      Ok(()) => Outcome::success("Removed from favorites", favorite_id.clone()),
      Err(err) => Outcome::failure(err),
    }
  }

  /// Dejar de seguir: primero las aristas, luego la lista del usuario y la
  /// del artista. Las aristas borradas se recrean desde su copia si falla una
  /// lista, así nunca queda una arista sin las dos pertenencias.
  pub async fn unfollow_artist(&self, user_id: &UserId, artist_id: &ArtistId) -> Outcome<ArtistId> {
    let _owner = self.lock_owner(user_id).await;

    let users = self.stores.users.as_ref();
    let artists = self.stores.artists.as_ref();
    let follows = self.stores.follows.as_ref();

    let (user, artist, edges) = match futures::try_join!(
      load(users, user_id.as_str()),
      find(artists, artist_id.as_str()),
      follow_edges(follows, user_id, artist_id),
    ) {
      Ok(found) => found,
      Err(err) => return Outcome::failure(err),
    };
    let user_linked = user.is_following(artist_id);
    let artist_linked = artist.is_some_and(|artist| artist.has_follower(user_id));

    if !user_linked && !artist_linked && edges.is_empty() {
      debug!(user_id = %user_id, artist_id = %artist_id, "not following, nothing to do");
      return Outcome::done("Not following this artist");
    }

    let mut saga = Saga::new("unfollow_artist");
    for edge in edges {
      let edge_id = edge.id.clone();
      saga = saga.step(
        Step::delete("delete follow edge", follows, edge_id.as_str()).compensate_with(Compensation::recreate(follows, edge)),
      );
    }
    if user_linked {
      saga = saga.step(
        Step::update(
          "remove artist from user",
          users,
          user_id.as_str(),
          FieldChanges::new().remove(User::FOLLOWED_ARTISTS, artist_id.as_str()),
        )
        .compensate_with(Compensation::revert(
          users,
          user_id.as_str(),
          FieldChanges::new().append_unique(User::FOLLOWED_ARTISTS, artist_id.as_str()),
        )),
      );
    }
    if artist_linked {
      saga = saga.step(Step::update(
        "remove follower from artist",
        artists,
        artist_id.as_str(),
        FieldChanges::new().remove(Artist::FOLLOWERS, user_id.as_str()),
      ));
    }

    match saga.run(&self.sink).await {
      Ok(()) => {
        info!(user_id = %user_id, artist_id = %artist_id, "artist unfollowed");
        Outcome::success("Unfollowed artist", artist_id.clone())
      }
      Err(err) => Outcome::failure(err),
    }
  }

  pub async fn delete_playlist(&self, user_id: &UserId, playlist_id: &PlaylistId) -> Outcome<PlaylistId> {
    let _owner = self.lock_owner(user_id).await;

    let playlists = self.stores.playlists.as_ref();
    let playlist = match load_owned(playlists, playlist_id.as_str(), |p| p.is_owned_by(user_id)).await {
      Ok(playlist) => playlist,
      Err(err) => return Outcome::failure(err),
    };

    let saga = Saga::new("delete_playlist")
      .step(
        Step::delete("delete playlist", playlists, playlist_id.as_str())
          .compensate_with(Compensation::recreate(playlists, playlist)),
      )
      .step(Step::update(
        "unlink playlist from user",
        self.stores.users.as_ref(),
        user_id.as_str(),
        FieldChanges::new().remove(User::PLAYLISTS, playlist_id.as_str()),
      ));

    match saga.run(&self.sink).await {
      Ok(()) => Outcome::success("Playlist deleted", playlist_id.clone()),
      Err(err) => Outcome::failure(err),
    }
  }

  pub async fn delete_uploaded_music(&self, user_id: &UserId, music_id: &MusicId) -> Outcome<MusicId> {
    let _owner = self.lock_owner(user_id).await;

    let tracks = self.stores.music.as_ref();
    let users = self.stores.users.as_ref();
    let music = match load_owned(tracks, music_id.as_str(), |m| m.is_uploaded_by(user_id)).await {
      Ok(music) => music,
      Err(err) => return Outcome::failure(err),
    };
    let artist_id = music.artist_id.clone();

    let mut saga = Saga::new("delete_uploaded_music")
      .step(Step::delete("delete music", tracks, music_id.as_str()).compensate_with(Compensation::recreate(tracks, music)))
      .step(Step::update(
        "unlink upload from user",
        users,
        user_id.as_str(),
        FieldChanges::new().remove(User::UPLOADED_MUSIC, music_id.as_str()),
      ))
      .step(
        Step::update("drop upload counter", users, user_id.as_str(), FieldChanges::new().increment(User::UPLOAD_COUNT, -1))
          .best_effort(),
      );

    if let Some(artist_id) = &artist_id {
      saga = saga.step(
        Step::update(
          "unlink music from artist",
          self.stores.artists.as_ref(),
          artist_id.as_str(),
          FieldChanges::new().remove(Artist::MUSIC_IDS, music_id.as_str()),
        )
        .best_effort(),
      );
    }

    match saga.run(&self.sink).await {
      Ok(()) => Outcome::success("Music deleted", music_id.clone()),
      Err(err) => Outcome::failure(err),
    }
  }

  // -------- Lectura --------

  /// Perfil de un usuario con sus relaciones. `None` si el usuario no
  /// existe o no se pudo leer.
  pub async fn get_user_with_relationships(&self, user_id: &UserId) -> Option<UserProfile> {
    ProfileComposer::new(&self.stores).compose(user_id).await
  }
}

async fn find<D: Document>(store: &dyn CollectionStore<D>, id: &str) -> Result<Option<D>, WorkflowError> {
  store.get(id).await.map_err(|err| WorkflowError::Read { collection: D::COLLECTION, message: err.message().to_owned() })
}

async fn load<D: Document>(store: &dyn CollectionStore<D>, id: &str) -> Result<D, WorkflowError> {
  find(store, id).await?.ok_or_else(|| WorkflowError::NotFound { collection: D::COLLECTION, id: id.to_owned() })
}

async fn follow_edges(
  store: &dyn CollectionStore<UserFollowArtist>,
  user_id: &UserId,
  artist_id: &ArtistId,
) -> Result<Vec<UserFollowArtist>, WorkflowError> {
  let filter = Filter::eq(UserFollowArtist::USER_ID, user_id.as_str()).and_eq(UserFollowArtist::ARTIST_ID, artist_id.as_str());
  store.list(&filter).await.map_err(|err| WorkflowError::Read { collection: Collection::Follows, message: err.message().to_owned() })
}

async fn load_owned<D: Document>(
  store: &dyn CollectionStore<D>,
  id: &str,
  is_owner: impl FnOnce(&D) -> bool,
) -> Result<D, WorkflowError> {
  let record = load(store, id).await?;
  if !is_owner(&record) {
    return Err(WorkflowError::NotOwner { collection: D::COLLECTION, id: id.to_owned() });
  }
  Ok(record)
}
