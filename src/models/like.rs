use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a like points at. Exactly one kind per relation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeTarget::Video => "video",
            LikeTarget::Comment => "comment",
            LikeTarget::Tweet => "tweet",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub target_kind: LikeTarget,
    pub target_id: String,
    pub liked_by: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(target_kind: LikeTarget, target_id: &str, liked_by: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            target_kind,
            target_id: target_id.to_string(),
            liked_by: liked_by.to_string(),
            created_at: Utc::now(),
        }
    }
}
