use std::sync::Arc;

use cadence_core::domain::{ArtistId, FavoriteId, FollowId, MusicDraft, MusicId, PlaylistId, UserId};
use cadence_core::ports::ReconciliationSink;
use cadence_core::services::UserProfile;
use cadence_core::{Outcome, RelationshipCoordinator};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub type SharedSink = Arc<dyn ReconciliationSink>;
pub type Coordinator = RelationshipCoordinator<SharedSink>;

/// Callback-style surface for the UI layer.
///
/// Each method spawns the workflow on the runtime and returns at once; the
/// completion handler receives the outcome when the workflow (including
/// any compensation) has finished. The returned `JoinHandle` is only for
/// callers that want to wait; dropping it does not cancel the workflow.
#[derive(Clone)]
pub struct CoordinatorHandle {
  coordinator: Arc<Coordinator>,
  runtime: Handle,
}

impl CoordinatorHandle {
  pub fn new(coordinator: Arc<Coordinator>, runtime: Handle) -> Self {
    Self { coordinator, runtime }
  }

  pub fn coordinator(&self) -> &Arc<Coordinator> {
    &self.coordinator
  }

  pub fn add_music_to_favorites<F>(&self, user_id: UserId, music_id: MusicId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<FavoriteId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.add_music_to_favorites(&user_id, &music_id).await) })
  }

  pub fn follow_artist<F>(&self, user_id: UserId, artist_id: ArtistId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<FollowId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.follow_artist(&user_id, &artist_id).await) })
  }

  pub fn create_playlist_with_music<F>(
    &self,
    user_id: UserId,
    name: String,
    description: String,
    music_ids: Vec<MusicId>,
    on_done: F,
  ) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<PlaylistId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move {
      on_done(coordinator.create_playlist_with_music(&user_id, &name, &description, &music_ids).await)
    })
  }

  pub fn upload_music<F>(&self, user_id: UserId, draft: MusicDraft, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<MusicId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.upload_music(&user_id, draft).await) })
  }

  pub fn remove_music_from_favorites<F>(&self, user_id: UserId, favorite_id: FavoriteId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<FavoriteId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.remove_music_from_favorites(&user_id, &favorite_id).await) })
  }

  pub fn unfollow_artist<F>(&self, user_id: UserId, artist_id: ArtistId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<ArtistId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.unfollow_artist(&user_id, &artist_id).await) })
  }

  pub fn delete_playlist<F>(&self, user_id: UserId, playlist_id: PlaylistId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<PlaylistId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.delete_playlist(&user_id, &playlist_id).await) })
  }

  pub fn delete_uploaded_music<F>(&self, user_id: UserId, music_id: MusicId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Outcome<MusicId>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.delete_uploaded_music(&user_id, &music_id).await) })
  }

  pub fn get_user_with_relationships<F>(&self, user_id: UserId, on_done: F) -> JoinHandle<()>
  where
    F: FnOnce(Option<UserProfile>) + Send + 'static,
  {
    let coordinator = self.coordinator.clone();
    self.runtime.spawn(async move { on_done(coordinator.get_user_with_relationships(&user_id).await) })
  }
}
