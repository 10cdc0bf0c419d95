//! Data models for API requests and persistence.

/// Comment data types.
pub mod comment;
/// Like relation types.
pub mod like;
/// Playlist data types.
pub mod playlist;
/// Subscription relation types.
pub mod subscription;
/// Tweet data types.
pub mod tweet;
/// User data types.
pub mod user;
/// Video data types.
pub mod video;
