pub mod artist;
pub mod document;
pub mod favorite;
pub mod follow;
pub mod ids;
pub mod music;
pub mod playlist;
pub mod rating;
pub mod relations;
pub mod user;

pub use artist::Artist;
pub use document::{Collection, Document};
pub use favorite::Favorite;
pub use follow::UserFollowArtist;
pub use ids::{ArtistId, FavoriteId, FollowId, MusicId, PlaylistId, UserId};
pub use music::{Music, MusicDraft};
pub use playlist::Playlist;
pub use rating::Rating;
pub use user::User;
