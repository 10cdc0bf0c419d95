//! Comment endpoints: paginated listing plus create/update/delete with the
//! counter maintenance on the parent video.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::Claims,
    error::{ensure_owner, AppError},
    handlers::resolve_owners,
    models::comment::{Comment, CommentView, CreateCommentRequest, UpdateCommentRequest},
    pagination::{self, ListQuery, PageParams},
    AppState,
};

/// Paginated comment listing for one video: owner identity, `is_liked`, and
/// `is_owner` are computed in the same pass as the page.
pub async fn get_video_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(query): Query<ListQuery>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.db.videos.get(&video_id)?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let params = PageParams::from_query(query.page.as_deref(), query.limit.as_deref());
    let all = state.db.comments.list_for_video(&video_id)?;
    let (page, total) = pagination::window(all, &params);

    let owners = resolve_owners(&state.db, page.iter().map(|c| c.owner.clone()))?;
    let page_ids: Vec<String> = page.iter().map(|c| c.id.clone()).collect();
    let liked = state.db.likes.liked_comment_ids(&claims.sub, &page_ids)?;

    let comments: Vec<CommentView> = page
        .into_iter()
        .map(|comment| CommentView {
            is_owner: comment.owner == claims.sub,
            is_liked: liked.contains(&comment.id),
            owner: owners.get(&comment.owner).cloned(),
            id: comment.id,
            content: comment.content,
            video: comment.video,
            like_count: comment.like_count,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        })
        .collect();

    Ok(Json(json!({
        "comments": comments,
        "total_comments": total,
    })))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Comment can not be empty".to_string()));
    }

    if state.db.videos.get(&video_id)?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let comment = Comment::new(content, claims.sub.clone(), video_id.clone());
    state.db.comments.create(&comment)?;

    // The comment is committed; a counter failure only logs.
    if let Err(err) = state.db.videos.bump_comment_count(&video_id, 1) {
        tracing::error!("comment count update failed for video {}: {}", video_id, err);
    }

    let owner = state
        .db
        .users
        .get(&claims.sub)?
        .map(|user| crate::models::user::OwnerRef::from(&user));
    let view = CommentView {
        id: comment.id,
        content: comment.content,
        video: comment.video,
        like_count: 0,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        owner,
        is_owner: true,
        is_liked: false,
    };

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path((video_id, comment_id)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Comment can not be empty".to_string()));
    }

    let comment = lookup_comment(&state, &video_id, &comment_id)?;
    ensure_owner(&comment.owner, &claims.sub, "edit this comment")?;

    let updated = state
        .db
        .comments
        .update_content(&comment_id, content)?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok(Json(updated))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((video_id, comment_id)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let comment = lookup_comment(&state, &video_id, &comment_id)?;
    ensure_owner(&comment.owner, &claims.sub, "delete the comment")?;

    if state.db.comments.delete(&comment_id)? {
        if let Err(err) = state.db.videos.bump_comment_count(&video_id, -1) {
            tracing::error!("comment count update failed for video {}: {}", video_id, err);
        }
    }

    Ok(Json(json!({})))
}

/// Shared gauntlet for comment mutations: video exists, comment exists, and
/// the comment belongs to the named video. Order matters; a missing resource
/// must never surface as a membership or ownership failure.
fn lookup_comment(
    state: &AppState,
    video_id: &str,
    comment_id: &str,
) -> Result<Comment, AppError> {
    if state.db.videos.get(video_id)?.is_none() {
        return Err(AppError::NotFound("Video not found".to_string()));
    }

    let comment = state
        .db
        .comments
        .get(comment_id)?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.video != video_id {
        return Err(AppError::BadRequest(
            "Comment does not belong to this video".to_string(),
        ));
    }

    Ok(comment)
}
