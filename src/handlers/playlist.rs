//! Playlist endpoints, including the one two-hop join in the API: a resolved
//! playlist carries owner identity on itself and on each contained video.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::Claims,
    error::{ensure_owner, AppError},
    handlers::resolve_owners,
    models::playlist::{
        CreatePlaylistRequest, Playlist, PlaylistSummary, PlaylistVideo, PlaylistView,
        UpdatePlaylistRequest,
    },
    models::user::OwnerRef,
    AppState,
};

pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>), AppError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Playlist name is required".to_string()));
    }
    let description = req
        .description
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    if state.db.playlists.name_exists(&claims.sub, &name, None)? {
        return Err(AppError::Conflict(
            "Playlist with this name already exists".to_string(),
        ));
    }

    let playlist = Playlist::new(name, description, claims.sub.clone());
    state.db.playlists.create(&playlist)?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn get_user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state
        .db
        .users
        .get(&user_id)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let owner = OwnerRef::from(&user);

    let playlists = state.db.playlists.list_for_owner(&user_id)?;
    let summaries: Vec<PlaylistSummary> = playlists
        .into_iter()
        .map(|playlist| PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            video_count: playlist.videos.len(),
            owner: owner.clone(),
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
        })
        .collect();

    Ok(Json(json!({
        "total": summaries.len(),
        "playlists": summaries,
    })))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<PlaylistView>, AppError> {
    let playlist = state
        .db
        .playlists
        .get(&playlist_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    let mut videos = Vec::with_capacity(playlist.videos.len());
    for video_id in &playlist.videos {
        // Deleted videos silently drop out of the resolved sequence.
        if let Some(video) = state.db.videos.get(video_id)? {
            videos.push(video);
        }
    }

    let owner_ids = videos
        .iter()
        .map(|v| v.owner.clone())
        .chain([playlist.owner.clone()]);
    let owners = resolve_owners(&state.db, owner_ids)?;

    let videos: Vec<PlaylistVideo> = videos
        .into_iter()
        .map(|video| PlaylistVideo {
            owner: owners.get(&video.owner).cloned(),
            id: video.id,
            title: video.title,
            thumbnail: video.thumbnail,
            duration: video.duration,
            views: video.views,
        })
        .collect();

    Ok(Json(PlaylistView {
        id: playlist.id,
        name: playlist.name,
        description: playlist.description,
        owner: owners.get(&playlist.owner).cloned(),
        videos,
        created_at: playlist.created_at,
        updated_at: playlist.updated_at,
    }))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<Json<Playlist>, AppError> {
    let playlist = state
        .db
        .playlists
        .get(&playlist_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    ensure_owner(&playlist.owner, &claims.sub, "update playlist")?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Playlist name is required".to_string()));
    }
    let description = req
        .description
        .map(|d| d.trim().to_string())
        .unwrap_or_default();

    if state
        .db
        .playlists
        .name_exists(&claims.sub, &name, Some(&playlist_id))?
    {
        return Err(AppError::Conflict(
            "You already have a playlist with this name".to_string(),
        ));
    }

    let updated = state
        .db
        .playlists
        .update_details(&playlist_id, name, description)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let playlist = state
        .db
        .playlists
        .get(&playlist_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    ensure_owner(&playlist.owner, &claims.sub, "delete playlist")?;

    state.db.playlists.delete(&playlist_id)?;
    Ok(Json(json!({})))
}

pub async fn add_video_to_playlist(
    State(state): State<AppState>,
    Path((playlist_id, video_id)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Playlist>, AppError> {
    let playlist = state
        .db
        .playlists
        .get(&playlist_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    ensure_owner(&playlist.owner, &claims.sub, "add video in this playlist")?;

    if state.db.videos.get(&video_id)?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let updated = state
        .db
        .playlists
        .add_video(&playlist_id, &video_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn remove_video_from_playlist(
    State(state): State<AppState>,
    Path((playlist_id, video_id)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Playlist>, AppError> {
    let playlist = state
        .db
        .playlists
        .get(&playlist_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    ensure_owner(
        &playlist.owner,
        &claims.sub,
        "delete video from this playlist",
    )?;

    if state.db.videos.get(&video_id)?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let updated = state
        .db
        .playlists
        .remove_video(&playlist_id, &video_id)?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(updated))
}
