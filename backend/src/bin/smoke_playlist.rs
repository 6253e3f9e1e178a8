use cadence_core::domain::{Artist, ArtistId, User, UserId};
use cadence_lib::AppConfig;
use cadence_lib::infrastructure::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = AppConfig::load()?;
  init_tracing(&config.logging)?;
  let handle = cadence_lib::build(&config)?;
  let coordinator = handle.coordinator();
  let stores = coordinator.stores();

  let user_id = UserId::from("smoke_user");
  if stores.users.get(user_id.as_str()).await?.is_none() {
    stores.users.create(User::new(user_id.clone(), "Smoke Test", "smoke@example.com")).await?;
  }
  let artist_id = ArtistId::from("smoke_artist");
  if stores.artists.get(artist_id.as_str()).await?.is_none() {
    stores.artists.create(Artist::new(artist_id.clone(), "Smoke Band")).await?;
  }

  let follow = coordinator.follow_artist(&user_id, &artist_id).await;
  println!("Follow: {}", follow.message());

  let playlist = coordinator.create_playlist_with_music(&user_id, "Road Trip", "smoke run", &[]).await;
  println!("Playlist: {}", playlist.message());

  let Some(profile) = coordinator.get_user_with_relationships(&user_id).await else {
    anyhow::bail!("profile for {user_id} could not be loaded");
  };
  println!(
    "{}: {} playlists, following {} artists, degraded {:?}",
    profile.user.display_name,
    profile.playlists.len(),
    profile.followed_artists.len(),
    profile.degraded
  );

  if let Some(playlist_id) = playlist.into_payload() {
    let deleted = coordinator.delete_playlist(&user_id, &playlist_id).await;
    println!("Cleanup: {}", deleted.message());
  }

  Ok(())
}
