//! Subscription toggle and the subscriber/channel listings.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::json;

use crate::{
    auth::Claims,
    error::AppError,
    handlers::resolve_owners,
    models::subscription::{ChannelEntry, SubscriberEntry},
    AppState,
};

pub async fn toggle_subscription(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Rejected before any lookup.
    if channel_id == claims.sub {
        return Err(AppError::BadRequest(
            "You can not subscribe to yourself".to_string(),
        ));
    }

    if state.db.users.get(&channel_id)?.is_none() {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    let result = state.db.subscriptions.toggle(&channel_id, &claims.sub)?;
    Ok(Json(json!({ "is_subscribed": result.active })))
}

pub async fn get_channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.db.users.get(&channel_id)?.is_none() {
        return Err(AppError::NotFound("Channel not found".to_string()));
    }

    let subscriptions = state.db.subscriptions.list_subscribers(&channel_id)?;
    let owners = resolve_owners(
        &state.db,
        subscriptions.iter().map(|s| s.subscriber.clone()),
    )?;

    let subscribers: Vec<SubscriberEntry> = subscriptions
        .into_iter()
        .filter_map(|subscription| {
            owners.get(&subscription.subscriber).map(|owner| SubscriberEntry {
                subscriber: owner.clone(),
                subscribed_at: subscription.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "total_subscribers": subscribers.len(),
        "subscribers": subscribers,
    })))
}

pub async fn get_subscribed_channels(
    State(state): State<AppState>,
    Path(subscriber_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.db.users.get(&subscriber_id)?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let subscriptions = state.db.subscriptions.list_subscriptions(&subscriber_id)?;
    let owners = resolve_owners(&state.db, subscriptions.iter().map(|s| s.channel.clone()))?;

    let channels: Vec<ChannelEntry> = subscriptions
        .into_iter()
        .filter_map(|subscription| {
            owners.get(&subscription.channel).map(|owner| ChannelEntry {
                channel: owner.clone(),
                subscribed_at: subscription.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "total_subscriptions": channels.len(),
        "channels": channels,
    })))
}
