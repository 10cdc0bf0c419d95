//! Registration, session, and channel-profile endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::{self, Claims},
    error::AppError,
    models::user::{
        ChannelProfile, LoginRequest, RefreshRequest, RegisterRequest, User, UserProfile,
    },
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    let full_name = req.full_name.trim().to_string();
    if username.is_empty() || email.is_empty() || full_name.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let password_hash = auth::hash_password(&req.password)?;
    let user = User::new(
        username,
        email,
        full_name,
        password_hash,
        req.avatar,
        req.cover_image,
    );
    state.db.users.create(&user)?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = match (req.username.as_deref(), req.email.as_deref()) {
        (Some(username), _) => state.db.users.get_by_username(username)?,
        (None, Some(email)) => state.db.users.get_by_email(email)?,
        (None, None) => {
            return Err(AppError::BadRequest(
                "Username or email is required".to_string(),
            ))
        }
    };

    let user =
        user.ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;
    if !auth::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = auth::create_access_token(&state.config, &user)?;
    let refresh_token = auth::create_refresh_token(&state.config, &user.id)?;
    state
        .db
        .users
        .set_refresh_token(&user.id, Some(refresh_token.clone()))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(json!({
        "user": UserProfile::from(&user),
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

/// Exchange a refresh token for a fresh token pair. The presented token must
/// match the one stored on the user record, and a successful exchange
/// rotates it.
pub async fn refresh_session(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = auth::decode_refresh_token(&state.config, &req.refresh_token)?;

    let user = state
        .db
        .users
        .get(&claims.sub)?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;
    if user.refresh_token.as_deref() != Some(req.refresh_token.as_str()) {
        return Err(AppError::Unauthorized(
            "Refresh token has been revoked".to_string(),
        ));
    }

    let access_token = auth::create_access_token(&state.config, &user)?;
    let refresh_token = auth::create_refresh_token(&state.config, &user.id)?;
    state
        .db
        .users
        .set_refresh_token(&user.id, Some(refresh_token.clone()))?;

    Ok(Json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.users.set_refresh_token(&claims.sub, None)?;
    Ok(Json(json!({})))
}

pub async fn current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .db
        .users
        .get(&claims.sub)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(UserProfile::from(&user)))
}

/// Channel page by username: public identity plus subscription aggregates
/// and whether the requesting user is subscribed.
pub async fn channel_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ChannelProfile>, AppError> {
    let user = state
        .db
        .users
        .get_by_username(&username)?
        .ok_or_else(|| AppError::NotFound("Channel not found".to_string()))?;

    let subscriber_count = state.db.subscriptions.count_subscribers(&user.id)?;
    let channel_count = state.db.subscriptions.list_subscriptions(&user.id)?.len();
    let is_subscribed = state.db.subscriptions.is_subscribed(&user.id, &claims.sub)?;

    Ok(Json(ChannelProfile {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        avatar: user.avatar,
        cover_image: user.cover_image,
        subscriber_count,
        channel_count,
        is_subscribed,
    }))
}
