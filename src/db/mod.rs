//! Sled-backed entity store, one tree per collection.

/// Comment storage helpers.
pub mod comment;
/// Like relation storage helpers.
pub mod like;
/// Playlist storage helpers.
pub mod playlist;
/// Subscription relation storage helpers.
pub mod subscription;
/// Tweet storage helpers.
pub mod tweet;
/// User storage helpers.
pub mod user;
/// Video storage helpers.
pub mod video;

use crate::error::AppError;
use sled::Db;
use std::sync::Arc;


/// Database handle with access to the per-collection trees.
pub struct Database {
    pub db: Arc<Db>,
    pub users: user::UserDb,
    pub videos: video::VideoDb,
    pub comments: comment::CommentDb,
    pub likes: like::LikeDb,
    pub subscriptions: subscription::SubscriptionDb,
    pub playlists: playlist::PlaylistDb,
    pub tweets: tweet::TweetDb,
}

impl Database {
    /// Open the database and initialize all collection trees.
    pub fn new(path: &str) -> Result<Self, AppError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Arc::new(sled::open(path)?);
        Self::from_shared(db)
    }

    /// Build a handle from an already-open sled instance. Used when another
    /// component in the same process needs its own tree handles without
    /// reopening the database path.
    pub fn from_shared(db: Arc<Db>) -> Result<Self, AppError> {
        Ok(Self {
            users: user::UserDb::new(db.clone())?,
            videos: video::VideoDb::new(db.clone())?,
            comments: comment::CommentDb::new(db.clone())?,
            likes: like::LikeDb::new(db.clone())?,
            subscriptions: subscription::SubscriptionDb::new(db.clone())?,
            playlists: playlist::PlaylistDb::new(db.clone())?,
            tweets: tweet::TweetDb::new(db.clone())?,
            db,
        })
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<(), AppError> {
        self.db.flush()?;
        Ok(())
    }
}

/// Outcome of a relation toggle.
#[derive(Debug, Clone, Copy)]
pub struct ToggleResult {
    /// Whether the relation is active after this call.
    pub active: bool,
    /// Set when a concurrent insert for the same key won the race. The
    /// relation is active, but the caller must not bump the counter again.
    pub raced: bool,
}

/// Apply a signed delta to a denormalized counter, floored at zero.
pub(crate) fn apply_delta(count: u64, delta: i64) -> u64 {
    if delta >= 0 {
        count.saturating_add(delta as u64)
    } else {
        count.saturating_sub(delta.unsigned_abs())
    }
}
