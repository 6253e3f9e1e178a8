use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::domain::Document;
use cadence_core::ports::{CollectionStore, Collections, FieldChanges, Filter, StoreError};
use chrono::{SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::document::{from_str, from_value, to_value};
use crate::error::StorageError;
use crate::models::{DocumentRow, NewDocumentRow};
use crate::schema::documents;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions {
  journal_mode: Option<String>,
  busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

fn timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Almacén SQLite: una tabla `documents` con el JSON de cada registro,
/// clave `(collection, id)`.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Abre (o crea) la base y aplica las migraciones pendientes.
  pub fn open(path: &Path, cfg: &StorageConfig) -> Result<Self, StorageError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
    let pool = Pool::builder()
      .max_size(cfg.pool_size.max(1))
      .connection_timeout(Duration::from_millis(cfg.busy_timeout_ms.max(1_000)))
      .connection_customizer(Box::new(ConnectionOptions {
        journal_mode: cfg.journal_mode.clone(),
        busy_timeout_ms: cfg.busy_timeout_ms,
      }))
      .build(manager)?;

    let mut pooled = pool.get()?;
    let conn: &mut SqliteConnection = &mut pooled;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    info!(db = %path.display(), migrations = applied.len(), "sqlite store ready");

    Ok(Self { pool })
  }

  pub fn collection<D: Document>(&self) -> SqliteCollection<D> {
    SqliteCollection { pool: self.pool.clone(), _marker: PhantomData }
  }

  pub fn collections(&self) -> Collections {
    Collections {
      users: Arc::new(self.collection()),
      favorites: Arc::new(self.collection()),
      playlists: Arc::new(self.collection()),
      artists: Arc::new(self.collection()),
      music: Arc::new(self.collection()),
      follows: Arc::new(self.collection()),
    }
  }
}

pub struct SqliteCollection<D> {
  pool: SqlitePool,
  _marker: PhantomData<fn() -> D>,
}

impl<D: Document> SqliteCollection<D> {
  /// Ejecuta `f` con una conexión del pool fuera del runtime async.
  async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
  where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, StorageError> + Send + 'static,
  {
    let pool = self.pool.clone();
    let result = tokio::task::spawn_blocking(move || {
      let mut conn = pool.get()?;
      f(&mut *conn)
    })
    .await
    .map_err(StorageError::from)?;

    result.map_err(StoreError::from)
  }
}

#[async_trait]
impl<D: Document> CollectionStore<D> for SqliteCollection<D> {
  async fn create(&self, record: D) -> Result<String, StoreError> {
    let collection = D::COLLECTION;
    let id = record.document_id().to_owned();
    let now = timestamp();
    let row = NewDocumentRow {
      collection: collection.as_str().to_owned(),
      id: id.clone(),
      body: to_value(&record)?.to_string(),
      created_at: now.clone(),
      updated_at: now,
    };

    self
      .with_conn(move |conn| match diesel::insert_into(documents::table).values(&row).execute(conn) {
        Ok(_) => Ok(()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
          Err(StorageError::AlreadyExists { collection, id: row.id })
        }
        Err(e) => Err(e.into()),
      })
      .await?;

    debug!(collection = collection.as_str(), id = %id, "document created");
    Ok(id)
  }

  async fn update(&self, id: &str, changes: FieldChanges) -> Result<(), StoreError> {
    let collection = D::COLLECTION;
    let id = id.to_owned();

    self
      .with_conn(move |conn| {
        conn.immediate_transaction::<_, StorageError, _>(|conn| {
          let body: Option<String> = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id.as_str()))
            .select(documents::body)
            .first(conn)
            .optional()?;
          let Some(body) = body else {
            return Err(StorageError::NotFound { collection, id: id.clone() });
          };

          let mut value = from_str::<D>(&body)?;
          changes.apply_to(&mut value)?;
          from_value::<D>(value.clone())?;

          let target = documents::table.filter(documents::collection.eq(collection.as_str())).filter(documents::id.eq(id.as_str()));
          diesel::update(target)
            .set((documents::body.eq(value.to_string()), documents::updated_at.eq(timestamp())))
            .execute(conn)?;
          Ok(())
        })
      })
      .await
  }

  async fn delete(&self, id: &str) -> Result<(), StoreError> {
    let collection = D::COLLECTION;
    let id = id.to_owned();

    self
      .with_conn(move |conn| {
        let target = documents::table.filter(documents::collection.eq(collection.as_str())).filter(documents::id.eq(id.as_str()));
        let removed = diesel::delete(target).execute(conn)?;
        if removed == 0 {
          return Err(StorageError::NotFound { collection, id });
        }
        Ok(())
      })
      .await
  }

  async fn get(&self, id: &str) -> Result<Option<D>, StoreError> {
    let collection = D::COLLECTION;
    let id = id.to_owned();

    self
      .with_conn(move |conn| {
        let body: Option<String> = documents::table
          .filter(documents::collection.eq(collection.as_str()))
          .filter(documents::id.eq(id.as_str()))
          .select(documents::body)
          .first(conn)
          .optional()?;
        body.map(|body| from_str::<D>(&body).and_then(from_value::<D>)).transpose()
      })
      .await
  }

  async fn list(&self, filter: &Filter) -> Result<Vec<D>, StoreError> {
    let collection = D::COLLECTION;
    let filter = filter.clone();

    self
      .with_conn(move |conn| {
        let rows: Vec<DocumentRow> = documents::table
          .filter(documents::collection.eq(collection.as_str()))
          .order((documents::created_at.asc(), documents::id.asc()))
          .select(DocumentRow::as_select())
          .load(conn)?;

        let mut records = Vec::new();
        for row in rows {
          let value = from_str::<D>(&row.body)?;
          if filter.matches(&value) {
            records.push(from_value::<D>(value)?);
          }
        }
        Ok(records)
      })
      .await
  }
}
