use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::OwnerRef;

/// Handle to an already-uploaded media object. The upload pipeline and blob
/// store live outside this service; only the references pass through here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub video_file: MediaRef,
    pub thumbnail: MediaRef,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: u64,
    pub is_published: bool,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(
        owner: String,
        title: String,
        description: String,
        duration: f64,
        video_file: MediaRef,
        thumbnail: MediaRef,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            video_file,
            thumbnail,
            owner,
            title,
            description,
            duration,
            views: 0,
            is_published: true,
            like_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PublishVideoRequest {
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub video_file: MediaRef,
    pub thumbnail: MediaRef,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<MediaRef>,
}

#[derive(Debug, Deserialize)]
pub struct VideoListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub query: Option<String>,
    pub user_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
}

/// Video with its owner identity joined in.
#[derive(Debug, Serialize)]
pub struct VideoView {
    pub id: String,
    pub video_file: MediaRef,
    pub thumbnail: MediaRef,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: u64,
    pub is_published: bool,
    pub like_count: u64,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: Option<OwnerRef>,
}

impl VideoView {
    pub fn new(video: Video, owner: Option<OwnerRef>) -> Self {
        Self {
            id: video.id,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            title: video.title,
            description: video.description,
            duration: video.duration,
            views: video.views,
            is_published: video.is_published,
            like_count: video.like_count,
            comment_count: video.comment_count,
            created_at: video.created_at,
            updated_at: video.updated_at,
            owner,
        }
    }
}
