use crate::{db::ToggleResult, error::AppError, models::subscription::Subscription};
use sled::Db;
use std::sync::Arc;

/// Subscription relations, keyed `{channel}:{subscriber}` so the store
/// enforces at-most-one per pair and a channel's subscribers share a key
/// prefix.
pub struct SubscriptionDb {
    tree: sled::Tree,
}

impl SubscriptionDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("subscriptions")?;
        Ok(Self { tree })
    }

    fn key(channel: &str, subscriber: &str) -> String {
        format!("{}:{}", channel, subscriber)
    }

    /// Flip the subscription for (subscriber, channel). Same convergence
    /// rules as the like toggle; callers reject self-subscription before
    /// getting here.
    pub fn toggle(&self, channel: &str, subscriber: &str) -> Result<ToggleResult, AppError> {
        let key = Self::key(channel, subscriber);

        if self.tree.remove(key.as_bytes())?.is_some() {
            return Ok(ToggleResult {
                active: false,
                raced: false,
            });
        }

        let subscription = Subscription::new(subscriber, channel);
        let value = bincode::serialize(&subscription)?;
        let raced = self
            .tree
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(value))?
            .is_err();

        Ok(ToggleResult {
            active: true,
            raced,
        })
    }

    pub fn is_subscribed(&self, channel: &str, subscriber: &str) -> Result<bool, AppError> {
        Ok(self
            .tree
            .contains_key(Self::key(channel, subscriber).as_bytes())?)
    }

    /// All subscriptions to a channel, newest first. Prefix scan on the
    /// channel id.
    pub fn list_subscribers(&self, channel: &str) -> Result<Vec<Subscription>, AppError> {
        let prefix = format!("{}:", channel);
        let mut subscriptions = Vec::new();
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            subscriptions.push(bincode::deserialize::<Subscription>(&value)?);
        }

        sort_newest_first(&mut subscriptions);
        Ok(subscriptions)
    }

    /// All channels a user subscribes to, newest first. Full scan; the
    /// subscriber sits on the far side of the composite key.
    pub fn list_subscriptions(&self, subscriber: &str) -> Result<Vec<Subscription>, AppError> {
        let mut subscriptions = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let subscription: Subscription = bincode::deserialize(&value)?;
            if subscription.subscriber == subscriber {
                subscriptions.push(subscription);
            }
        }

        sort_newest_first(&mut subscriptions);
        Ok(subscriptions)
    }

    pub fn count_subscribers(&self, channel: &str) -> Result<usize, AppError> {
        let prefix = format!("{}:", channel);
        let mut count = 0;
        for item in self.tree.scan_prefix(prefix.as_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

fn sort_newest_first(subscriptions: &mut [Subscription]) {
    subscriptions.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
