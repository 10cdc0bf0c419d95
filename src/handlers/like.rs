//! Like toggle endpoints and the liked-videos listing.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::Claims,
    db::apply_delta,
    error::AppError,
    handlers::resolve_owners,
    models::{like::LikeTarget, video::VideoView},
    AppState,
};

pub async fn toggle_video_like(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let video = state
        .db
        .videos
        .get(&video_id)?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let (is_liked, like_count) =
        apply_toggle(&state, LikeTarget::Video, &video_id, video.like_count, &claims.sub)?;

    Ok(Json(json!({ "is_liked": is_liked, "like_count": like_count })))
}

pub async fn toggle_comment_like(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let comment = state
        .db
        .comments
        .get(&comment_id)?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    let (is_liked, like_count) = apply_toggle(
        &state,
        LikeTarget::Comment,
        &comment_id,
        comment.like_count,
        &claims.sub,
    )?;

    Ok(Json(json!({ "is_liked": is_liked, "like_count": like_count })))
}

pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tweet = state
        .db
        .tweets
        .get(&tweet_id)?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let (is_liked, like_count) =
        apply_toggle(&state, LikeTarget::Tweet, &tweet_id, tweet.like_count, &claims.sub)?;

    Ok(Json(json!({ "is_liked": is_liked, "like_count": like_count })))
}

/// Videos the actor has liked, newest like first, with owner identity.
pub async fn get_liked_videos(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let likes = state.db.likes.video_likes_by(&claims.sub)?;

    let mut videos = Vec::with_capacity(likes.len());
    for like in &likes {
        // The liked video may have been deleted since; skip the hole.
        if let Some(video) = state.db.videos.get(&like.target_id)? {
            videos.push(video);
        }
    }

    let owners = resolve_owners(&state.db, videos.iter().map(|v| v.owner.clone()))?;
    let views: Vec<VideoView> = videos
        .into_iter()
        .map(|video| {
            let owner = owners.get(&video.owner).cloned();
            VideoView::new(video, owner)
        })
        .collect();

    Ok(Json(json!({ "total_videos": views.len(), "videos": views })))
}

/// Toggle the relation, then maintain the target's denormalized counter.
/// The relation write is authoritative; a counter failure is logged and the
/// response falls back to the expected value.
fn apply_toggle(
    state: &AppState,
    kind: LikeTarget,
    target_id: &str,
    current_count: u64,
    actor: &str,
) -> Result<(bool, u64), AppError> {
    let result = state.db.likes.toggle(kind, target_id, actor)?;

    if result.raced {
        // A concurrent insert already counted this relation.
        return Ok((true, current_count));
    }

    let delta = if result.active { 1 } else { -1 };
    let expected = apply_delta(current_count, delta);

    let like_count = match bump_target(state, kind, target_id, delta) {
        Ok(Some(count)) => count,
        Ok(None) => expected,
        Err(err) => {
            tracing::error!(
                "like count update failed for {} {}: {}",
                kind.as_str(),
                target_id,
                err
            );
            expected
        }
    };

    Ok((result.active, like_count))
}

fn bump_target(
    state: &AppState,
    kind: LikeTarget,
    target_id: &str,
    delta: i64,
) -> Result<Option<u64>, AppError> {
    match kind {
        LikeTarget::Video => state.db.videos.bump_like_count(target_id, delta),
        LikeTarget::Comment => state.db.comments.bump_like_count(target_id, delta),
        LikeTarget::Tweet => state.db.tweets.bump_like_count(target_id, delta),
    }
}
