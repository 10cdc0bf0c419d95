//! Channel dashboard: aggregate stats and a channel's video list.

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;

use crate::{
    db::video::{VideoFilter, VideoSort},
    error::AppError,
    handlers::video::join_owners,
    pagination::{self, ListQuery, PageParams},
    AppState,
};

/// Totals over a channel's published videos. Subscriber and like totals
/// come from the relation trees, not the denormalized counters, so the
/// dashboard reflects the ground truth.
pub async fn channel_stats(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.db.users.get(&channel_id)?.is_none() {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    let filter = VideoFilter {
        owner: Some(channel_id.clone()),
        published_only: true,
        ..Default::default()
    };
    let videos = state.db.videos.list(&filter, VideoSort::CreatedAt, false)?;

    let total_videos = videos.len();
    let total_views: u64 = videos.iter().map(|v| v.views).sum();
    let video_ids: HashSet<String> = videos.into_iter().map(|v| v.id).collect();

    let total_subscribers = state.db.subscriptions.count_subscribers(&channel_id)?;
    let total_likes = state.db.likes.count_for_videos(&video_ids)?;

    Ok(Json(json!({
        "total_videos": total_videos,
        "total_views": total_views,
        "total_subscribers": total_subscribers,
        "total_likes": total_likes,
    })))
}

/// A channel's published videos, newest first.
pub async fn channel_videos(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.db.users.get(&channel_id)?.is_none() {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    let params = PageParams::from_query(query.page.as_deref(), query.limit.as_deref());
    let filter = VideoFilter {
        owner: Some(channel_id),
        published_only: true,
        ..Default::default()
    };

    let videos = state.db.videos.list(&filter, VideoSort::CreatedAt, false)?;
    let (page, total) = pagination::window(videos, &params);
    let views = join_owners(&state, page)?;

    Ok(Json(json!({
        "page": params.page,
        "total_pages": params.total_pages(total),
        "total_videos": total,
        "videos": views,
    })))
}
