//! HTTP server wiring for StreamHub (API, handlers, and shared state).

/// Credential service and bearer-token middleware.
pub mod auth;
/// Environment-driven configuration.
pub mod config;
/// Sled-backed persistence, one store per collection.
pub mod db;
/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers, one module per resource.
pub mod handlers;
/// Entity and request/response models.
pub mod models;
/// Lenient page/limit parsing and listing windows.
pub mod pagination;

pub use config::Config;
pub use db::Database;
pub use error::AppError;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    // Configure CORS - optionally allow public access
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", state.config.port)
                    .parse()
                    .unwrap(),
                format!("http://127.0.0.1:{}", state.config.port)
                    .parse()
                    .unwrap(),
            ])
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
    };

    let public = Router::new()
        .route("/api/healthcheck", get(handlers::healthcheck::healthcheck))
        .route("/api/users/register", post(handlers::user::register))
        .route("/api/users/login", post(handlers::user::login))
        .route("/api/users/refresh", post(handlers::user::refresh_session));

    let protected = Router::new()
        // Users and sessions
        .route("/api/users/logout", post(handlers::user::logout))
        .route("/api/users/me", get(handlers::user::current_user))
        .route("/api/users/c/:username", get(handlers::user::channel_profile))
        .route(
            "/api/users/:id/subscriptions",
            get(handlers::subscription::get_subscribed_channels),
        )
        .route(
            "/api/users/:id/playlists",
            get(handlers::playlist::get_user_playlists),
        )
        .route("/api/users/:id/tweets", get(handlers::tweet::get_user_tweets))
        // Videos
        .route("/api/videos", get(handlers::video::list_videos))
        .route("/api/videos", post(handlers::video::publish_video))
        .route("/api/videos/:id", get(handlers::video::get_video))
        .route("/api/videos/:id", put(handlers::video::update_video))
        .route("/api/videos/:id", delete(handlers::video::delete_video))
        .route(
            "/api/videos/:id/toggle-publish",
            put(handlers::video::toggle_publish),
        )
        // Comments
        .route(
            "/api/videos/:id/comments",
            get(handlers::comment::get_video_comments),
        )
        .route(
            "/api/videos/:id/comments",
            post(handlers::comment::add_comment),
        )
        .route(
            "/api/videos/:id/comments/:comment_id",
            put(handlers::comment::update_comment),
        )
        .route(
            "/api/videos/:id/comments/:comment_id",
            delete(handlers::comment::delete_comment),
        )
        // Likes
        .route("/api/likes/video/:id", post(handlers::like::toggle_video_like))
        .route(
            "/api/likes/comment/:id",
            post(handlers::like::toggle_comment_like),
        )
        .route("/api/likes/tweet/:id", post(handlers::like::toggle_tweet_like))
        .route("/api/likes/videos", get(handlers::like::get_liked_videos))
        // Subscriptions
        .route(
            "/api/subscriptions/:channel_id",
            post(handlers::subscription::toggle_subscription),
        )
        .route(
            "/api/channels/:id/subscribers",
            get(handlers::subscription::get_channel_subscribers),
        )
        // Channel dashboard
        .route("/api/channels/:id/stats", get(handlers::dashboard::channel_stats))
        .route(
            "/api/channels/:id/videos",
            get(handlers::dashboard::channel_videos),
        )
        // Playlists
        .route("/api/playlists", post(handlers::playlist::create_playlist))
        .route("/api/playlists/:id", get(handlers::playlist::get_playlist))
        .route("/api/playlists/:id", put(handlers::playlist::update_playlist))
        .route(
            "/api/playlists/:id",
            delete(handlers::playlist::delete_playlist),
        )
        .route(
            "/api/playlists/:id/videos/:video_id",
            post(handlers::playlist::add_video_to_playlist),
        )
        .route(
            "/api/playlists/:id/videos/:video_id",
            delete(handlers::playlist::remove_video_from_playlist),
        )
        // Tweets
        .route("/api/tweets", post(handlers::tweet::create_tweet))
        .route("/api/tweets/:id", put(handlers::tweet::update_tweet))
        .route("/api/tweets/:id", delete(handlers::tweet::delete_tweet))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    public
        .merge(protected)
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_body_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    header::HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    header::HeaderValue::from_static("DENY"),
                )),
        )
}

/// Resolve the listener address from env var overrides and security policy.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state, allow_public_access);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
