//! Tweet endpoints.

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
    models::tweet::{CreateTweetRequest, Tweet, TweetView, UpdateTweetRequest},
    models::user::OwnerRef,
    AppState,
};

pub async fn create_tweet(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetView>), AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Tweet content is required".to_string()));
    }

    let tweet = Tweet::new(content, claims.sub.clone());
    state.db.tweets.create(&tweet)?;

    let owner = resolve_owners(&state.db, [claims.sub.clone()])?.remove(&claims.sub);
    Ok((StatusCode::CREATED, Json(to_view(tweet, owner))))
}

pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state
        .db
        .users
        .get(&user_id)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let owner = OwnerRef::from(&user);

    let tweets: Vec<TweetView> = state
        .db
        .tweets
        .list_for_owner(&user_id)?
        .into_iter()
        .map(|tweet| to_view(tweet, Some(owner.clone())))
        .collect();

    Ok(Json(json!({
        "total_tweets": tweets.len(),
        "tweets": tweets,
    })))
}

pub async fn update_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateTweetRequest>,
) -> Result<Json<TweetView>, AppError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::BadRequest("Tweet content is required".to_string()));
    }

    let tweet = state
        .db
        .tweets
        .get(&tweet_id)?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;
    ensure_owner(&tweet.owner, &claims.sub, "update tweet")?;

    let updated = state
        .db
        .tweets
        .update_content(&tweet_id, content)?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    let owner = resolve_owners(&state.db, [updated.owner.clone()])?.remove(&updated.owner);
    Ok(Json(to_view(updated, owner)))
}

pub async fn delete_tweet(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tweet = state
        .db
        .tweets
        .get(&tweet_id)?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;
    ensure_owner(&tweet.owner, &claims.sub, "delete tweet")?;

    state.db.tweets.delete(&tweet_id)?;
    Ok(Json(json!({})))
}

fn to_view(tweet: Tweet, owner: Option<OwnerRef>) -> TweetView {
    TweetView {
        id: tweet.id,
        content: tweet.content,
        like_count: tweet.like_count,
        created_at: tweet.created_at,
        updated_at: tweet.updated_at,
        owner,
    }
}
