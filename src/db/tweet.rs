use crate::{db::apply_delta, error::AppError, models::tweet::Tweet};
use sled::Db;
use std::sync::Arc;

pub struct TweetDb {
    tree: sled::Tree,
}

impl TweetDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("tweets")?;
        Ok(Self { tree })
    }

    pub fn create(&self, tweet: &Tweet) -> Result<(), AppError> {
        let value = bincode::serialize(tweet)?;
        self.tree.insert(tweet.id.as_bytes(), value)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Tweet>, AppError> {
        Ok(self
            .tree
            .get(id.as_bytes())?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    pub fn update_content(&self, id: &str, content: String) -> Result<Option<Tweet>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let content = content.clone();
            old.and_then(|bytes| {
                let mut tweet: Tweet = bincode::deserialize(bytes).ok()?;
                tweet.content = content;
                tweet.updated_at = chrono::Utc::now();
                bincode::serialize(&tweet).ok()
            })
        })?;

        match result {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.tree.remove(id.as_bytes())?.is_some())
    }

    /// Adjust the denormalized like counter, floored at zero.
    pub fn bump_like_count(&self, id: &str, delta: i64) -> Result<Option<u64>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            old.and_then(|bytes| {
                let mut tweet: Tweet = bincode::deserialize(bytes).ok()?;
                tweet.like_count = apply_delta(tweet.like_count, delta);
                bincode::serialize(&tweet).ok()
            })
        })?;

        match result {
            Some(bytes) => {
                let tweet: Tweet = bincode::deserialize(&bytes)?;
                Ok(Some(tweet.like_count))
            }
            None => Ok(None),
        }
    }

    /// All tweets by an owner, newest first.
    pub fn list_for_owner(&self, owner: &str) -> Result<Vec<Tweet>, AppError> {
        let mut tweets = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let tweet: Tweet = bincode::deserialize(&value)?;
            if tweet.owner == owner {
                tweets.push(tweet);
            }
        }

        tweets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tweets)
    }
}
