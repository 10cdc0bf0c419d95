//! Video endpoints: the public listing plus owner-gated mutations.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::Claims,
    db::video::{VideoFilter, VideoSort},
    error::{ensure_owner, AppError},
    handlers::resolve_owners,
    models::video::{
        PublishVideoRequest, UpdateVideoRequest, Video, VideoListQuery, VideoView,
    },
    pagination::{self, PageParams},
    AppState,
};

/// Published videos with optional text query, owner filter, and allow-listed
/// sort. Page and total come from one scan.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let params = PageParams::from_query(query.page.as_deref(), query.limit.as_deref());
    let sort = VideoSort::parse(query.sort_by.as_deref());
    let ascending = query.sort_type.as_deref() == Some("asc");

    let filter = VideoFilter {
        owner: query.user_id,
        query: query.query,
        published_only: true,
    };

    let all = state.db.videos.list(&filter, sort, ascending)?;
    let (page, total) = pagination::window(all, &params);
    let views = join_owners(&state, page)?;

    Ok(Json(json!({
        "page": params.page,
        "total_pages": params.total_pages(total),
        "total_videos": total,
        "videos": views,
    })))
}

pub async fn publish_video(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PublishVideoRequest>,
) -> Result<(StatusCode, Json<VideoView>), AppError> {
    let title = req.title.trim().to_string();
    let description = req.description.trim().to_string();
    if title.is_empty() || description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let video = Video::new(
        claims.sub.clone(),
        title,
        description,
        req.duration,
        req.video_file,
        req.thumbnail,
    );
    state.db.videos.create(&video)?;

    let owner = resolve_owners(&state.db, [claims.sub.clone()])?
        .remove(&claims.sub);

    Ok((StatusCode::CREATED, Json(VideoView::new(video, owner))))
}

/// Fetch one published video and count the view. The counter is
/// best-effort; a failed bump still returns the video.
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoView>, AppError> {
    let video = state
        .db
        .videos
        .get(&video_id)?
        .filter(|v| v.is_published)
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let video = match state.db.videos.increment_views(&video_id) {
        Ok(Some(updated)) => updated,
        Ok(None) => video,
        Err(err) => {
            tracing::error!("view count update failed for video {}: {}", video_id, err);
            video
        }
    };

    let owner = resolve_owners(&state.db, [video.owner.clone()])?
        .remove(&video.owner);

    Ok(Json(VideoView::new(video, owner)))
}

pub async fn update_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateVideoRequest>,
) -> Result<Json<VideoView>, AppError> {
    let video = state
        .db
        .videos
        .get(&video_id)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video.owner, &claims.sub, "update video")?;

    let title = req.title.trim().to_string();
    let description = req.description.trim().to_string();
    if title.is_empty() || description.is_empty() {
        return Err(AppError::BadRequest(
            "Title and description are required".to_string(),
        ));
    }

    let updated = state
        .db
        .videos
        .update(
            &video_id,
            UpdateVideoRequest {
                title,
                description,
                thumbnail: req.thumbnail,
            },
        )?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let owner = resolve_owners(&state.db, [updated.owner.clone()])?
        .remove(&updated.owner);

    Ok(Json(VideoView::new(updated, owner)))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let video = state
        .db
        .videos
        .get(&video_id)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video.owner, &claims.sub, "delete video")?;

    state.db.videos.delete(&video_id)?;

    // Stored media blobs are the object store's problem; this service only
    // forgets the references.
    tracing::info!(
        "video {} deleted; media handles released: {} {}",
        video_id,
        video.video_file.public_id,
        video.thumbnail.public_id
    );

    Ok(Json(json!({})))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let video = state
        .db
        .videos
        .get(&video_id)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video.owner, &claims.sub, "update toggle of this video")?;

    let updated = state
        .db
        .videos
        .toggle_publish(&video_id)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(json!({ "is_published": updated.is_published })))
}

pub(crate) fn join_owners(
    state: &AppState,
    videos: Vec<Video>,
) -> Result<Vec<VideoView>, AppError> {
    let owners = resolve_owners(&state.db, videos.iter().map(|v| v.owner.clone()))?;
    Ok(videos
        .into_iter()
        .map(|video| {
            let owner = owners.get(&video.owner).cloned();
            VideoView::new(video, owner)
        })
        .collect())
}
