use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::OwnerRef;
use crate::models::video::MediaRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Ordered video ids; duplicates are never stored.
    pub videos: Vec<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(name: String, description: String, owner: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            videos: Vec::new(),
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Listing row: playlist plus owner identity and a video count.
#[derive(Debug, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub video_count: usize,
    pub owner: OwnerRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video entry inside a resolved playlist, with its own owner identity.
#[derive(Debug, Serialize)]
pub struct PlaylistVideo {
    pub id: String,
    pub title: String,
    pub thumbnail: MediaRef,
    pub duration: f64,
    pub views: u64,
    pub owner: Option<OwnerRef>,
}

/// Fully resolved playlist: owner identity on the playlist and on each
/// contained video independently.
#[derive(Debug, Serialize)]
pub struct PlaylistView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<OwnerRef>,
    pub videos: Vec<PlaylistVideo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
