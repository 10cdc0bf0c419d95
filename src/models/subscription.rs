use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::OwnerRef;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub subscriber: String,
    pub channel: String,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(subscriber: &str, channel: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subscriber: subscriber.to_string(),
            channel: channel.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// One row of a channel's subscriber listing.
#[derive(Debug, Serialize)]
pub struct SubscriberEntry {
    pub subscriber: OwnerRef,
    pub subscribed_at: DateTime<Utc>,
}

/// One row of a user's subscribed-channels listing.
#[derive(Debug, Serialize)]
pub struct ChannelEntry {
    pub channel: OwnerRef,
    pub subscribed_at: DateTime<Utc>,
}
