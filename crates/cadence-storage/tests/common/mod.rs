#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::domain::{Artist, Collection, Document, Favorite, Music, MusicDraft, Playlist, User, UserFollowArtist};
use cadence_core::ports::{
  CollectionStore, Collections, FieldChanges, Filter, ReconciliationEvent, ReconciliationSink, StoreError,
};
use cadence_core::{CoordinatorOptions, RelationshipCoordinator};
use cadence_storage::MemoryCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
  Create,
  Update,
  Delete,
  Get,
  List,
}

/// Orden global de llamadas entre todas las colecciones.
pub type Journal = Arc<Mutex<Vec<(Collection, Op)>>>;

/// Envuelve un almacén real y permite forzar fallos por operación.
pub struct FaultInjectingStore<D: Document> {
  inner: Arc<dyn CollectionStore<D>>,
  faults: Mutex<HashMap<Op, String>>,
  calls: Mutex<Vec<Op>>,
  delay: Mutex<Option<Duration>>,
  journal: Journal,
}

impl<D: Document> FaultInjectingStore<D> {
  pub fn new(inner: Arc<dyn CollectionStore<D>>, journal: Journal) -> Self {
    Self { inner, faults: Mutex::default(), calls: Mutex::default(), delay: Mutex::default(), journal }
  }

  pub fn in_memory(journal: &Journal) -> Self {
    Self::new(Arc::new(MemoryCollection::<D>::new()), journal.clone())
  }

  pub fn fail(&self, op: Op, message: &str) {
    self.faults.lock().unwrap().insert(op, message.to_owned());
  }

  pub fn heal(&self, op: Op) {
    self.faults.lock().unwrap().remove(&op);
  }

  /// Retrasa cada operación; sirve para abrir ventanas de carrera.
  pub fn slow_down(&self, delay: Duration) {
    *self.delay.lock().unwrap() = Some(delay);
  }

  pub fn calls(&self) -> Vec<Op> {
    self.calls.lock().unwrap().clone()
  }

  pub fn count(&self, op: Op) -> usize {
    self.calls().into_iter().filter(|c| *c == op).count()
  }

  pub fn reset_calls(&self) {
    self.calls.lock().unwrap().clear();
  }

  async fn enter(&self, op: Op) -> Result<(), StoreError> {
    self.calls.lock().unwrap().push(op);
    self.journal.lock().unwrap().push((D::COLLECTION, op));
    let delay = *self.delay.lock().unwrap();
    if let Some(delay) = delay {
      tokio::time::sleep(delay).await;
    }
    match self.faults.lock().unwrap().get(&op) {
      Some(message) => Err(StoreError::new(message.clone())),
      None => Ok(()),
    }
  }

  /// Lectura directa, sin pasar por los fallos inyectados.
  pub async fn peek(&self, id: &str) -> Option<D> {
    self.inner.get(id).await.unwrap()
  }

  pub async fn peek_all(&self) -> Vec<D> {
    self.inner.list(&Filter::all()).await.unwrap()
  }

  pub async fn seed(&self, record: D) {
    self.inner.create(record).await.unwrap();
  }

  /// Borra por fuera del coordinador, como haría otro cliente.
  pub async fn purge(&self, id: &str) {
    self.inner.delete(id).await.unwrap();
  }
}

#[async_trait]
impl<D: Document> CollectionStore<D> for FaultInjectingStore<D> {
  async fn create(&self, record: D) -> Result<String, StoreError> {
    self.enter(Op::Create).await?;
    self.inner.create(record).await
  }

  async fn update(&self, id: &str, changes: FieldChanges) -> Result<(), StoreError> {
    self.enter(Op::Update).await?;
    self.inner.update(id, changes).await
  }

  async fn delete(&self, id: &str) -> Result<(), StoreError> {
    self.enter(Op::Delete).await?;
    self.inner.delete(id).await
  }

  async fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
    self.enter(Op::Get).await?;
    self.inner.get(id).await
  }

  async fn list(&self, filter: &Filter) -> Result<Vec<D>, StoreError> {
    self.enter(Op::List).await?;
    self.inner.list(filter).await
  }
}

#[derive(Default)]
pub struct RecordingSink {
  events: Mutex<Vec<ReconciliationEvent>>,
}

impl RecordingSink {
  pub fn events(&self) -> Vec<ReconciliationEvent> {
    self.events.lock().unwrap().clone()
  }
}

#[async_trait]
impl ReconciliationSink for RecordingSink {
  async fn record(&self, event: ReconciliationEvent) {
    self.events.lock().unwrap().push(event);
  }
}

/// Almacenes en memoria con fallos inyectables y un sink que guarda eventos.
pub struct Harness {
  pub users: Arc<FaultInjectingStore<User>>,
  pub favorites: Arc<FaultInjectingStore<Favorite>>,
  pub playlists: Arc<FaultInjectingStore<Playlist>>,
  pub artists: Arc<FaultInjectingStore<Artist>>,
  pub music: Arc<FaultInjectingStore<Music>>,
  pub follows: Arc<FaultInjectingStore<UserFollowArtist>>,
  pub sink: Arc<RecordingSink>,
  pub journal: Journal,
}

impl Harness {
  pub fn new() -> Self {
    let journal = Journal::default();
    Self {
      users: Arc::new(FaultInjectingStore::in_memory(&journal)),
      favorites: Arc::new(FaultInjectingStore::in_memory(&journal)),
      playlists: Arc::new(FaultInjectingStore::in_memory(&journal)),
      artists: Arc::new(FaultInjectingStore::in_memory(&journal)),
      music: Arc::new(FaultInjectingStore::in_memory(&journal)),
      follows: Arc::new(FaultInjectingStore::in_memory(&journal)),
      sink: Arc::new(RecordingSink::default()),
      journal,
    }
  }

  /// Escrituras (create/update/delete) en el orden en que llegaron.
  pub fn writes(&self) -> Vec<(Collection, Op)> {
    let journal = self.journal.lock().unwrap();
    journal.iter().copied().filter(|(_, op)| matches!(op, Op::Create | Op::Update | Op::Delete)).collect()
  }

  /// Crea `u1`, `u2`, el artista `a1` y las pistas `m1`, `m2` (subidas por `u2`).
  pub async fn seeded() -> Self {
    let harness = Self::new();
    harness.users.seed(User::new("u1".into(), "Ana", "ana@example.com")).await;
    harness.users.seed(User::new("u2".into(), "Bruno", "bruno@example.com")).await;
    harness.artists.seed(Artist::new("a1".into(), "The Cadences")).await;
    for id in ["m1", "m2"] {
      let draft = MusicDraft { title: format!("Track {id}"), artist_name: "The Cadences".into(), ..MusicDraft::default() };
      harness.music.seed(draft.into_music(id.into(), "u2".into(), chrono::Utc::now())).await;
    }
    harness
  }

  pub fn collections(&self) -> Collections {
    Collections {
      users: self.users.clone(),
      favorites: self.favorites.clone(),
      playlists: self.playlists.clone(),
      artists: self.artists.clone(),
      music: self.music.clone(),
      follows: self.follows.clone(),
    }
  }

  pub fn coordinator(&self) -> RelationshipCoordinator<Arc<RecordingSink>> {
    self.coordinator_with(CoordinatorOptions::default())
  }

  pub fn coordinator_with(&self, options: CoordinatorOptions) -> RelationshipCoordinator<Arc<RecordingSink>> {
    RelationshipCoordinator::with_options(self.collections(), self.sink.clone(), options)
  }

  pub fn reset_calls(&self) {
    self.journal.lock().unwrap().clear();
    self.users.reset_calls();
    self.favorites.reset_calls();
    self.playlists.reset_calls();
    self.artists.reset_calls();
    self.music.reset_calls();
    self.follows.reset_calls();
  }
}
