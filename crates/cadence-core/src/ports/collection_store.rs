use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Artist, Collection, Document, Favorite, Music, Playlist, User, UserFollowArtist};

/// Fallo reportado por un almacén de colección.
///
/// El mensaje es un diagnóstico legible; el coordinador nunca lo interpreta,
/// solo lo propaga dentro de `WorkflowError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
  message: String,
}

impl StoreError {
  pub fn new(message: impl Into<String>) -> Self {
    StoreError { message: message.into() }
  }

  pub fn not_found(collection: Collection, id: &str) -> Self {
    StoreError::new(format!("document {}/{id} not found", collection.as_str()))
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Cambio sobre un campo de un documento.
///
/// Las variantes de lista y contador se aplican sobre el valor actual del
/// almacén (semántica `arrayUnion` / `arrayRemove` / `increment`), así dos
/// flujos concurrentes sobre el mismo usuario no se pisan.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
  Set(Value),
  AppendUnique(Value),
  Remove(Value),
  Increment(i64),
}

/// Conjunto de cambios de un `update`, por nombre de campo del documento.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges(BTreeMap<String, FieldChange>);

impl FieldChanges {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(self, field: &str, value: impl Into<Value>) -> Self {
    self.with(field, FieldChange::Set(value.into()))
  }

  pub fn append_unique(self, field: &str, value: impl Into<Value>) -> Self {
    self.with(field, FieldChange::AppendUnique(value.into()))
  }

  pub fn remove(self, field: &str, value: impl Into<Value>) -> Self {
    self.with(field, FieldChange::Remove(value.into()))
  }

  pub fn increment(self, field: &str, by: i64) -> Self {
    self.with(field, FieldChange::Increment(by))
  }

  fn with(mut self, field: &str, change: FieldChange) -> Self {
    self.0.insert(field.to_owned(), change);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldChange)> {
    self.0.iter().map(|(field, change)| (field.as_str(), change))
  }

  /// Aplica los cambios sobre un documento JSON.
  ///
  /// Todos los adaptadores comparten esta función, así la semántica de
  /// `update` es idéntica en memoria, en SQLite o en un backend remoto.
  /// Si algún cambio no es aplicable el documento queda intacto.
  pub fn apply_to(&self, document: &mut Value) -> Result<(), StoreError> {
    let Value::Object(fields) = document else {
      return Err(StoreError::new("document is not an object"));
    };

    let mut updated = fields.clone();
    for (field, change) in self.iter() {
      apply_change(&mut updated, field, change)?;
    }

    *fields = updated;
    Ok(())
  }
}

fn apply_change(fields: &mut Map<String, Value>, field: &str, change: &FieldChange) -> Result<(), StoreError> {
  match change {
    FieldChange::Set(value) => {
      fields.insert(field.to_owned(), value.clone());
    }
    FieldChange::AppendUnique(value) => match fields.get_mut(field) {
      None | Some(Value::Null) => {
        fields.insert(field.to_owned(), Value::Array(vec![value.clone()]));
      }
      Some(Value::Array(items)) => {
        if !items.contains(value) {
          items.push(value.clone());
        }
      }
      Some(_) => return Err(StoreError::new(format!("field `{field}` is not an array"))),
    },
    FieldChange::Remove(value) => match fields.get_mut(field) {
      None | Some(Value::Null) => {}
      Some(Value::Array(items)) => items.retain(|item| item != value),
      Some(_) => return Err(StoreError::new(format!("field `{field}` is not an array"))),
    },
    FieldChange::Increment(by) => {
      let current = match fields.get(field) {
        None | Some(Value::Null) => 0,
        Some(value) => {
          value.as_i64().ok_or_else(|| StoreError::new(format!("field `{field}` is not an integer")))?
        }
      };

      let next = current
        .checked_add(*by)
        .ok_or_else(|| StoreError::new(format!("counter `{field}` overflowed")))?;

      // Los contadores del dominio son sin signo.
      if next < 0 {
        return Err(StoreError::new(format!("counter `{field}` cannot go below zero")));
      }

      fields.insert(field.to_owned(), Value::from(next));
    }
  }

  Ok(())
}

/// Filtro de `list`: conjunción de igualdades campo = valor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
  clauses: Vec<(String, Value)>,
}

impl Filter {
  /// Sin cláusulas: todos los documentos de la colección.
  pub fn all() -> Self {
    Self::default()
  }

  pub fn eq(field: &str, value: impl Into<Value>) -> Self {
    Self::all().and_eq(field, value)
  }

  pub fn and_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.clauses.push((field.to_owned(), value.into()));
    self
  }

  pub fn clauses(&self) -> &[(String, Value)] {
    &self.clauses
  }

  pub fn matches(&self, document: &Value) -> bool {
    self.clauses.iter().all(|(field, expected)| document.get(field) == Some(expected))
  }
}

/// Port del cliente de una colección del backend.
///
/// Una instancia por tipo de entidad. Cada operación es asíncrona y `Err` es
/// la única señal de fallo.
#[async_trait]
pub trait CollectionStore<D: Document>: Send + Sync {
  /// Crea el documento con el id que ya trae el registro y lo devuelve.
  async fn create(&self, record: D) -> Result<String, StoreError>;

  async fn update(&self, id: &str, changes: FieldChanges) -> Result<(), StoreError>;

  async fn delete(&self, id: &str) -> Result<(), StoreError>;

  async fn get(&self, id: &str) -> Result<Option<D>, StoreError>;

  async fn list(&self, filter: &Filter) -> Result<Vec<D>, StoreError>;
}

/// Los almacenes de todas las colecciones que toca el coordinador.
#[derive(Clone)]
pub struct Collections {
  pub users: Arc<dyn CollectionStore<User>>,
  pub favorites: Arc<dyn CollectionStore<Favorite>>,
  pub playlists: Arc<dyn CollectionStore<Playlist>>,
  pub artists: Arc<dyn CollectionStore<Artist>>,
  pub music: Arc<dyn CollectionStore<Music>>,
  pub follows: Arc<dyn CollectionStore<UserFollowArtist>>,
}
