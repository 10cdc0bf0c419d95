use crate::{
    db::apply_delta,
    error::AppError,
    models::video::{UpdateVideoRequest, Video},
};
use sled::Db;
use std::cmp::Ordering;
use std::sync::Arc;

/// Allow-listed sort keys for video listings. Anything else falls back to
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSort {
    CreatedAt,
    Views,
    Duration,
}

impl VideoSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("views") => VideoSort::Views,
            Some("duration") => VideoSort::Duration,
            _ => VideoSort::CreatedAt,
        }
    }
}

/// Filter applied while scanning the video tree.
#[derive(Debug, Default)]
pub struct VideoFilter {
    pub owner: Option<String>,
    /// Case-insensitive substring match against title and description.
    pub query: Option<String>,
    pub published_only: bool,
}

pub struct VideoDb {
    tree: sled::Tree,
}

impl VideoDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("videos")?;
        Ok(Self { tree })
    }

    pub fn create(&self, video: &Video) -> Result<(), AppError> {
        let value = bincode::serialize(video)?;
        self.tree.insert(video.id.as_bytes(), value)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Video>, AppError> {
        Ok(self
            .tree
            .get(id.as_bytes())?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    pub fn update(
        &self,
        id: &str,
        update: UpdateVideoRequest,
    ) -> Result<Option<Video>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let update = UpdateVideoRequest {
                title: update.title.clone(),
                description: update.description.clone(),
                thumbnail: update.thumbnail.clone(),
            };
            old.and_then(|bytes| {
                let mut video: Video = bincode::deserialize(bytes).ok()?;
                video.title = update.title;
                video.description = update.description;
                if let Some(thumbnail) = update.thumbnail {
                    video.thumbnail = thumbnail;
                }
                video.updated_at = chrono::Utc::now();
                bincode::serialize(&video).ok()
            })
        })?;

        decode_updated(result)
    }

    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.tree.remove(id.as_bytes())?.is_some())
    }

    pub fn toggle_publish(&self, id: &str) -> Result<Option<Video>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), |old| {
            old.and_then(|bytes| {
                let mut video: Video = bincode::deserialize(bytes).ok()?;
                video.is_published = !video.is_published;
                video.updated_at = chrono::Utc::now();
                bincode::serialize(&video).ok()
            })
        })?;

        decode_updated(result)
    }

    pub fn increment_views(&self, id: &str) -> Result<Option<Video>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), |old| {
            old.and_then(|bytes| {
                let mut video: Video = bincode::deserialize(bytes).ok()?;
                video.views = video.views.saturating_add(1);
                bincode::serialize(&video).ok()
            })
        })?;

        decode_updated(result)
    }

    /// Adjust the denormalized like counter, floored at zero. Returns the
    /// new value, or `None` when the video no longer exists.
    pub fn bump_like_count(&self, id: &str, delta: i64) -> Result<Option<u64>, AppError> {
        Ok(self.bump(id, delta, true)?.map(|v| v.like_count))
    }

    /// Adjust the denormalized comment counter, floored at zero.
    pub fn bump_comment_count(&self, id: &str, delta: i64) -> Result<Option<u64>, AppError> {
        Ok(self.bump(id, delta, false)?.map(|v| v.comment_count))
    }

    fn bump(&self, id: &str, delta: i64, likes: bool) -> Result<Option<Video>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            old.and_then(|bytes| {
                let mut video: Video = bincode::deserialize(bytes).ok()?;
                if likes {
                    video.like_count = apply_delta(video.like_count, delta);
                } else {
                    video.comment_count = apply_delta(video.comment_count, delta);
                }
                bincode::serialize(&video).ok()
            })
        })?;

        decode_updated(result)
    }

    /// Scan the collection with the filter applied, fully sorted. The caller
    /// windows the result; total count and page then come from one scan.
    pub fn list(
        &self,
        filter: &VideoFilter,
        sort: VideoSort,
        ascending: bool,
    ) -> Result<Vec<Video>, AppError> {
        let query = filter.query.as_ref().map(|q| q.to_lowercase());
        let mut videos = Vec::new();

        for item in self.tree.iter() {
            let (_, value) = item?;
            let video: Video = bincode::deserialize(&value)?;

            if filter.published_only && !video.is_published {
                continue;
            }
            if let Some(ref owner) = filter.owner {
                if &video.owner != owner {
                    continue;
                }
            }
            if let Some(ref q) = query {
                if !video.title.to_lowercase().contains(q)
                    && !video.description.to_lowercase().contains(q)
                {
                    continue;
                }
            }
            videos.push(video);
        }

        sort_videos(&mut videos, sort, ascending);
        Ok(videos)
    }
}

fn decode_updated(result: Option<sled::IVec>) -> Result<Option<Video>, AppError> {
    match result {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}

/// Sort with an id tie-break so pagination stays stable when primary sort
/// values collide.
fn sort_videos(videos: &mut [Video], sort: VideoSort, ascending: bool) {
    videos.sort_by(|a, b| {
        let ord = match sort {
            VideoSort::CreatedAt => a.created_at.cmp(&b.created_at),
            VideoSort::Views => a.views.cmp(&b.views),
            VideoSort::Duration => a
                .duration
                .partial_cmp(&b.duration)
                .unwrap_or(Ordering::Equal),
        };
        let ord = ord.then_with(|| a.id.cmp(&b.id));
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}
