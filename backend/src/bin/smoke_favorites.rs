use cadence_core::domain::{MusicDraft, User, UserId};
use cadence_lib::AppConfig;
use cadence_lib::infrastructure::logging::init_tracing;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = AppConfig::load()?;
  init_tracing(&config.logging)?;
  let handle = cadence_lib::build(&config)?;
  let stores = handle.coordinator().stores().clone();

  let user_id = UserId::from("smoke_user");
  if stores.users.get(user_id.as_str()).await?.is_none() {
    stores.users.create(User::new(user_id.clone(), "Smoke Test", "smoke@example.com")).await?;
  }

  let draft = MusicDraft { title: "Smoke Signal".into(), artist_name: "Cadence".into(), ..MusicDraft::default() };
  let music_id = handle.coordinator().upload_music(&user_id, draft).await.into_result()?;
  let Some(music_id) = music_id else {
    anyhow::bail!("upload returned no id");
  };
  println!("Uploaded {music_id}");

  let (tx, rx) = oneshot::channel();
  handle.add_music_to_favorites(user_id.clone(), music_id, move |outcome| {
    let _ = tx.send(outcome);
  });
  let outcome = rx.await?;
  println!("Favorite: {}", outcome.message());

  if let Some(profile) = handle.coordinator().get_user_with_relationships(&user_id).await {
    println!("{} has {} favorites, {} uploads", profile.user.display_name, profile.favorites.len(), profile.uploads.len());
  }

  Ok(())
}
