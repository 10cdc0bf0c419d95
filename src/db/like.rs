use crate::{
    db::ToggleResult,
    error::AppError,
    models::like::{Like, LikeTarget},
};
use sled::Db;
use std::collections::HashSet;
use std::sync::Arc;

/// Like relations, keyed by the (kind, target, actor) triple so the store
/// itself enforces at-most-one active relation per triple.
pub struct LikeDb {
    tree: sled::Tree,
}

impl LikeDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("likes")?;
        Ok(Self { tree })
    }

    fn key(kind: LikeTarget, target_id: &str, user_id: &str) -> String {
        format!("{}:{}:{}", kind.as_str(), target_id, user_id)
    }

    /// Flip the relation for (actor, target). Removal goes first; when
    /// nothing was removed, insertion is compare-and-swap on the composite
    /// key, so a concurrent duplicate insert loses the race and converges on
    /// "already active" instead of erroring.
    pub fn toggle(
        &self,
        kind: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> Result<ToggleResult, AppError> {
        let key = Self::key(kind, target_id, user_id);

        if self.tree.remove(key.as_bytes())?.is_some() {
            return Ok(ToggleResult {
                active: false,
                raced: false,
            });
        }

        let like = Like::new(kind, target_id, user_id);
        let value = bincode::serialize(&like)?;
        let raced = self
            .tree
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(value))?
            .is_err();

        Ok(ToggleResult {
            active: true,
            raced,
        })
    }

    pub fn is_liked(
        &self,
        kind: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .tree
            .contains_key(Self::key(kind, target_id, user_id).as_bytes())?)
    }

    /// Which of the given comments the actor has liked. Point lookups on the
    /// composite key, one per candidate.
    pub fn liked_comment_ids(
        &self,
        user_id: &str,
        comment_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        let mut liked = HashSet::new();
        for comment_id in comment_ids {
            if self.is_liked(LikeTarget::Comment, comment_id, user_id)? {
                liked.insert(comment_id.clone());
            }
        }
        Ok(liked)
    }

    /// All video likes by an actor, newest first.
    pub fn video_likes_by(&self, user_id: &str) -> Result<Vec<Like>, AppError> {
        let mut likes = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let like: Like = bincode::deserialize(&value)?;
            if like.target_kind == LikeTarget::Video && like.liked_by == user_id {
                likes.push(like);
            }
        }

        likes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(likes)
    }

    /// Total likes across a set of videos. Used for channel stats.
    pub fn count_for_videos(&self, video_ids: &HashSet<String>) -> Result<u64, AppError> {
        if video_ids.is_empty() {
            return Ok(0);
        }

        let mut count = 0;
        for item in self.tree.iter() {
            let (_, value) = item?;
            let like: Like = bincode::deserialize(&value)?;
            if like.target_kind == LikeTarget::Video && video_ids.contains(&like.target_id) {
                count += 1;
            }
        }
        Ok(count)
    }
}
