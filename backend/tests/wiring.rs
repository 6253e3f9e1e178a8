use std::fs;

use cadence_config::{CadencePaths, TomlConfigBackend};
use cadence_core::domain::{Collection, MusicId, User, UserId};
use cadence_core::ports::{CompensationAction, ReconciliationEvent, ReconciliationSink};
use cadence_core::services::IdScheme;
use cadence_core::{CoordinatorOptions, Outcome};
use cadence_lib::config::{LogFormat, LoggingConfig, ReconciliationConfig, SinkKind};
use cadence_lib::infrastructure::reconciliation::JsonlReconciliationSink;
use cadence_lib::{AppConfig, build_with};
use cadence_storage::{MemoryStore, StorageBackend, StorageConfig};
use tempfile::tempdir;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

fn memory_config() -> AppConfig {
  AppConfig {
    storage: StorageConfig { backend: StorageBackend::Memory, ..StorageConfig::default() },
    coordinator: CoordinatorOptions::default(),
    logging: LoggingConfig::default(),
    reconciliation: ReconciliationConfig::default(),
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn callback_receives_the_outcome() {
  let stores = MemoryStore::new().collections();
  stores.users.create(User::new("u1".into(), "Ana", "ana@example.com")).await.unwrap();
  let handle = build_with(stores.clone(), &memory_config(), Handle::current());

  let (tx, rx) = oneshot::channel();
  let task = handle.add_music_to_favorites(UserId::from("u1"), MusicId::from("m1"), move |outcome| {
    tx.send(outcome).unwrap();
  });

  let outcome = rx.await.unwrap();
  task.await.unwrap();

  let favorite_id = outcome.into_payload().unwrap();
  assert!(favorite_id.as_str().starts_with("fav_"));
  let user = stores.users.get("u1").await.unwrap().unwrap();
  assert!(user.has_favorite(&favorite_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn callback_receives_failures_too() {
  let handle = build_with(MemoryStore::new().collections(), &memory_config(), Handle::current());

  let (tx, rx) = oneshot::channel::<Outcome<_>>();
  handle.add_music_to_favorites(UserId::from("ghost"), MusicId::from("m1"), move |outcome| {
    tx.send(outcome).unwrap();
  });

  let outcome = rx.await.unwrap();
  assert!(!outcome.is_success());
  assert!(outcome.message().starts_with("Could not update user"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn profile_callback_gets_none_for_unknown_user() {
  let handle = build_with(MemoryStore::new().collections(), &memory_config(), Handle::current());

  let (tx, rx) = oneshot::channel();
  handle
    .get_user_with_relationships(UserId::from("ghost"), move |profile| {
      tx.send(profile.is_none()).unwrap();
    })
    .await
    .unwrap();

  assert!(rx.await.unwrap());
}

#[tokio::test]
async fn jsonl_sink_appends_one_line_per_event() {
  let dir = tempdir().unwrap();
  let sink = JsonlReconciliationSink::new(dir.path().join("ops").join("reconciliation.jsonl"));

  sink
    .record(ReconciliationEvent::new("add_music_to_favorites", Collection::Favorites, "fav_1", CompensationAction::Delete, "quota exceeded"))
    .await;
  sink
    .record(ReconciliationEvent::new("delete_playlist", Collection::Playlists, "playlist_1", CompensationAction::Recreate, "timeout"))
    .await;

  let raw = fs::read_to_string(sink.path()).unwrap();
  let events: Vec<ReconciliationEvent> = raw.lines().map(|line| serde_json::from_str(line).unwrap()).collect();

  assert_eq!(events.len(), 2);
  assert_eq!(events[0].record_id, "fav_1");
  assert_eq!(events[1].action, CompensationAction::Recreate);
  assert_eq!(events[1].collection, Collection::Playlists);
}

#[test]
fn fresh_config_is_completed_and_written_back() {
  let dir = tempdir().unwrap();
  let backend = TomlConfigBackend::new(CadencePaths::from_base(dir.path()).unwrap());

  let config = AppConfig::load_from(&backend).unwrap();

  assert_eq!(config.coordinator, CoordinatorOptions::default());
  assert_eq!(config.logging.filter, "info");
  assert_eq!(config.reconciliation.sink, SinkKind::Log);
  assert_eq!(config.reconciliation.file, Some(dir.path().join("data").join("reconciliation.jsonl")));

  let raw = fs::read_to_string(backend.paths().config_file()).unwrap();
  for section in ["[storage]", "[coordinator]", "[logging]", "[reconciliation]"] {
    assert!(raw.contains(section), "missing {section} in:\n{raw}");
  }
}

#[test]
fn explicit_sections_are_honored() {
  let dir = tempdir().unwrap();
  let backend = TomlConfigBackend::new(CadencePaths::from_base(dir.path()).unwrap());
  fs::write(
    backend.paths().config_file(),
    "[coordinator]\nid_scheme = \"uuid\"\nserialize_per_owner = true\n\n[logging]\nformat = \"compact\"\n",
  )
  .unwrap();

  let config = AppConfig::load_from(&backend).unwrap();

  assert_eq!(config.coordinator.id_scheme, IdScheme::Uuid);
  assert!(config.coordinator.serialize_per_owner);
  assert_eq!(config.logging.format, LogFormat::Compact);
  assert_eq!(config.logging.filter, "info");
}
