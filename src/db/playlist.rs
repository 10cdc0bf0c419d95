use crate::{error::AppError, models::playlist::Playlist};
use sled::Db;
use std::sync::Arc;

pub struct PlaylistDb {
    tree: sled::Tree,
}

impl PlaylistDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        let tree = db.open_tree("playlists")?;
        Ok(Self { tree })
    }

    pub fn create(&self, playlist: &Playlist) -> Result<(), AppError> {
        let value = bincode::serialize(playlist)?;
        self.tree.insert(playlist.id.as_bytes(), value)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Playlist>, AppError> {
        Ok(self
            .tree
            .get(id.as_bytes())?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    pub fn update_details(
        &self,
        id: &str,
        name: String,
        description: String,
    ) -> Result<Option<Playlist>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let name = name.clone();
            let description = description.clone();
            old.and_then(|bytes| {
                let mut playlist: Playlist = bincode::deserialize(bytes).ok()?;
                playlist.name = name;
                playlist.description = description;
                playlist.updated_at = chrono::Utc::now();
                bincode::serialize(&playlist).ok()
            })
        })?;

        decode_updated(result)
    }

    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.tree.remove(id.as_bytes())?.is_some())
    }

    /// Append a video id, refusing duplicates. Re-adding an existing video
    /// leaves the sequence untouched.
    pub fn add_video(&self, id: &str, video_id: &str) -> Result<Option<Playlist>, AppError> {
        let video_id = video_id.to_string();
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let video_id = video_id.clone();
            old.and_then(|bytes| {
                let mut playlist: Playlist = bincode::deserialize(bytes).ok()?;
                if !playlist.videos.contains(&video_id) {
                    playlist.videos.push(video_id);
                    playlist.updated_at = chrono::Utc::now();
                }
                bincode::serialize(&playlist).ok()
            })
        })?;

        decode_updated(result)
    }

    /// Remove a video id if present. Removing an absent video is a no-op.
    pub fn remove_video(&self, id: &str, video_id: &str) -> Result<Option<Playlist>, AppError> {
        let video_id = video_id.to_string();
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let video_id = video_id.clone();
            old.and_then(|bytes| {
                let mut playlist: Playlist = bincode::deserialize(bytes).ok()?;
                if let Some(pos) = playlist.videos.iter().position(|v| *v == video_id) {
                    playlist.videos.remove(pos);
                    playlist.updated_at = chrono::Utc::now();
                }
                bincode::serialize(&playlist).ok()
            })
        })?;

        decode_updated(result)
    }

    /// All playlists belonging to an owner, newest first.
    pub fn list_for_owner(&self, owner: &str) -> Result<Vec<Playlist>, AppError> {
        let mut playlists = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let playlist: Playlist = bincode::deserialize(&value)?;
            if playlist.owner == owner {
                playlists.push(playlist);
            }
        }

        playlists.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(playlists)
    }

    /// Per-owner name uniqueness check, optionally excluding one playlist
    /// (the one being renamed).
    pub fn name_exists(
        &self,
        owner: &str,
        name: &str,
        exclude: Option<&str>,
    ) -> Result<bool, AppError> {
        for item in self.tree.iter() {
            let (_, value) = item?;
            let playlist: Playlist = bincode::deserialize(&value)?;
            if playlist.owner == owner
                && playlist.name == name
                && exclude != Some(playlist.id.as_str())
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn decode_updated(result: Option<sled::IVec>) -> Result<Option<Playlist>, AppError> {
    match result {
        Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
        None => Ok(None),
    }
}
