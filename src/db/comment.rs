use crate::{db::apply_delta, error::AppError, models::comment::Comment};
use sled::Db;
use std::sync::Arc;

pub struct CommentDb {
    tree: sled::Tree,
}

impl CommentDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("comments")?;
        Ok(Self { tree })
    }

    pub fn create(&self, comment: &Comment) -> Result<(), AppError> {
        let value = bincode::serialize(comment)?;
        self.tree.insert(comment.id.as_bytes(), value)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Comment>, AppError> {
        Ok(self
            .tree
            .get(id.as_bytes())?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    /// Replace the comment body. The video reference is immutable and is
    /// deliberately not touched here.
    pub fn update_content(&self, id: &str, content: String) -> Result<Option<Comment>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let content = content.clone();
            old.and_then(|bytes| {
                let mut comment: Comment = bincode::deserialize(bytes).ok()?;
                comment.content = content;
                comment.updated_at = chrono::Utc::now();
                bincode::serialize(&comment).ok()
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
                let mut comment: Comment = bincode::deserialize(bytes).ok()?;
                comment.like_count = apply_delta(comment.like_count, delta);
                bincode::serialize(&comment).ok()
            })
        })?;

        match result {
            Some(bytes) => {
                let comment: Comment = bincode::deserialize(&bytes)?;
                Ok(Some(comment.like_count))
            }
            None => Ok(None),
        }
    }

    /// All comments on a video, newest first with id tie-break.
    pub fn list_for_video(&self, video_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut comments = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let comment: Comment = bincode::deserialize(&value)?;
            if comment.video == video_id {
                comments.push(comment);
            }
        }

        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(comments)
    }
}
