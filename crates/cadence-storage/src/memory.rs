use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::domain::Document;
use cadence_core::ports::{CollectionStore, Collections, FieldChanges, Filter, StoreError};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::document::{from_value, to_value};
use crate::error::StorageError;

struct Entry {
  seq: u64,
  body: Value,
}

#[derive(Default)]
struct Table {
  next_seq: u64,
  entries: HashMap<String, Entry>,
}

/// Colección en memoria: documentos JSON detrás de un `RwLock`.
///
/// `update` se aplica con el candado de escritura tomado, así que los
/// cambios de campo son atómicos. `list` devuelve en orden de creación.
pub struct MemoryCollection<D> {
  table: RwLock<Table>,
  _marker: PhantomData<fn() -> D>,
}

impl<D: Document> Default for MemoryCollection<D> {
  fn default() -> Self {
    Self { table: RwLock::new(Table::default()), _marker: PhantomData }
  }
}

impl<D: Document> MemoryCollection<D> {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn len(&self) -> usize {
    self.table.read().await.entries.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.len().await == 0
  }
}

#[async_trait]
impl<D: Document> CollectionStore<D> for MemoryCollection<D> {
  async fn create(&self, record: D) -> Result<String, StoreError> {
    let id = record.document_id().to_owned();
    let body = to_value(&record)?;

    let mut table = self.table.write().await;
    if table.entries.contains_key(&id) {
      return Err(StorageError::AlreadyExists { collection: D::COLLECTION, id }.into());
    }

    let seq = table.next_seq;
    table.next_seq += 1;
    table.entries.insert(id.clone(), Entry { seq, body });
    Ok(id)
  }

  async fn update(&self, id: &str, changes: FieldChanges) -> Result<(), StoreError> {
    let mut table = self.table.write().await;
    let entry = table.entries.get_mut(id).ok_or_else(|| StoreError::not_found(D::COLLECTION, id))?;

    let mut body = entry.body.clone();
    changes.apply_to(&mut body)?;
    // El resultado debe seguir siendo un registro válido.
    from_value::<D>(body.clone())?;

    entry.body = body;
    Ok(())
  }

  async fn delete(&self, id: &str) -> Result<(), StoreError> {
    let mut table = self.table.write().await;
    match table.entries.remove(id) {
      Some(_) => Ok(()),
      None => Err(StoreError::not_found(D::COLLECTION, id)),
    }
  }

  async fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
    let table = self.table.read().await;
    match table.entries.get(id) {
      Some(entry) => Ok(Some(from_value(entry.body.clone())?)),
      None => Ok(None),
    }
  }

  async fn list(&self, filter: &Filter) -> Result<Vec<D>, StoreError> {
    let table = self.table.read().await;

    let mut matching: Vec<&Entry> = table.entries.values().filter(|entry| filter.matches(&entry.body)).collect();
    matching.sort_by_key(|entry| entry.seq);

    matching.into_iter().map(|entry| from_value(entry.body.clone()).map_err(StoreError::from)).collect()
  }
}

/// Un almacén en memoria por colección; útil para tests y modo sin disco.
#[derive(Clone)]
pub struct MemoryStore {
  collections: Collections,
}

impl MemoryStore {
  pub fn new() -> Self {
    let collections = Collections {
      users: Arc::new(MemoryCollection::new()),
      favorites: Arc::new(MemoryCollection::new()),
      playlists: Arc::new(MemoryCollection::new()),
      artists: Arc::new(MemoryCollection::new()),
      music: Arc::new(MemoryCollection::new()),
      follows: Arc::new(MemoryCollection::new()),
    };
    Self { collections }
  }

  pub fn collections(&self) -> Collections {
    self.collections.clone()
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}
