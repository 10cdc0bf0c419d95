//! Integration tests for the StreamHub HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use streamhub::{create_app, AppState, Config, Database};
use tempfile::TempDir;

fn test_config(db_path: &std::path::Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().unwrap().to_string(),
        max_body_size: 1_000_000,
        jwt_secret: "integration-test-secret".to_string(),
        access_token_ttl_mins: 5,
        refresh_token_ttl_days: 1,
    }
}

async fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let config = test_config(&db_path);
    let db = Database::new(&config.db_path).unwrap();
    let state = AppState::new(config, db);
    let app = create_app(state, false);
    let server = TestServer::new(app).unwrap();
    (server, temp_dir)
}

/// Register a user and log in, returning (access token, user id).
async fn register_and_login(server: &TestServer, username: &str) -> (String, String) {
    let register = server
        .post("/api/users/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "full_name": format!("{} Example", username),
            "password": "correct-horse-battery",
        }))
        .await;
    assert_eq!(register.status_code(), StatusCode::CREATED);
    let profile: serde_json::Value = register.json();
    let user_id = profile["id"].as_str().unwrap().to_string();

    let login = server
        .post("/api/users/login")
        .json(&json!({
            "username": username,
            "password": "correct-horse-battery",
        }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    let body: serde_json::Value = login.json();
    let token = body["access_token"].as_str().unwrap().to_string();

    (token, user_id)
}

fn video_payload(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": format!("Description for {}", title),
        "duration": 42.5,
        "video_file": { "url": "https://cdn.example.com/v/1.mp4", "public_id": "v-1" },
        "thumbnail": { "url": "https://cdn.example.com/t/1.jpg", "public_id": "t-1" },
    })
}

async fn publish_video(server: &TestServer, token: &str, title: &str) -> String {
    let response = server
        .post("/api/videos")
        .authorization_bearer(token)
        .json(&video_payload(title))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let video: serde_json::Value = response.json();
    video["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_conflicts_and_login_failures() {
    let (server, _temp) = setup_test_server().await;
    let (_token, _id) = register_and_login(&server, "alice").await;

    // Same username, different email
    let dup_username = server
        .post("/api/users/register")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "full_name": "Other Alice",
            "password": "correct-horse-battery",
        }))
        .await;
    assert_eq!(dup_username.status_code(), StatusCode::CONFLICT);
    let body: serde_json::Value = dup_username.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 409);

    // Same email, different username (case-insensitive)
    let dup_email = server
        .post("/api/users/register")
        .json(&json!({
            "username": "alice2",
            "email": "ALICE@example.com",
            "full_name": "Alice Again",
            "password": "correct-horse-battery",
        }))
        .await;
    assert_eq!(dup_email.status_code(), StatusCode::CONFLICT);

    let bad_password = server
        .post("/api/users/login")
        .json(&json!({ "username": "alice", "password": "wrong" }))
        .await;
    assert_eq!(bad_password.status_code(), StatusCode::UNAUTHORIZED);

    let unknown_user = server
        .post("/api/users/login")
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .await;
    assert_eq!(unknown_user.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (server, _temp) = setup_test_server().await;

    let no_token = server.get("/api/videos").await;
    assert_eq!(no_token.status_code(), StatusCode::UNAUTHORIZED);

    let bad_token = server
        .get("/api/videos")
        .authorization_bearer("not-a-real-token")
        .await;
    assert_eq!(bad_token.status_code(), StatusCode::UNAUTHORIZED);

    // Healthcheck stays public
    let health = server.get("/api/healthcheck").await;
    assert_eq!(health.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rotation_and_logout() {
    let (server, _temp) = setup_test_server().await;
    register_and_login(&server, "carol").await;

    let login = server
        .post("/api/users/login")
        .json(&json!({ "username": "carol", "password": "correct-horse-battery" }))
        .await;
    let body: serde_json::Value = login.json();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let refreshed = server
        .post("/api/users/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(refreshed.status_code(), StatusCode::OK);

    // The old refresh token was rotated out
    let reused = server
        .post("/api/users/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await;
    assert_eq!(reused.status_code(), StatusCode::UNAUTHORIZED);

    let logout = server
        .post("/api/users/logout")
        .authorization_bearer(&access_token)
        .await;
    assert_eq!(logout.status_code(), StatusCode::OK);

    let refreshed_body: serde_json::Value = refreshed.json();
    let rotated = refreshed_body["refresh_token"].as_str().unwrap();
    let after_logout = server
        .post("/api/users/refresh")
        .json(&json!({ "refresh_token": rotated }))
        .await;
    assert_eq!(after_logout.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_video_lifecycle_and_ownership() {
    let (server, _temp) = setup_test_server().await;
    let (owner_token, owner_id) = register_and_login(&server, "dave").await;
    let (other_token, _) = register_and_login(&server, "erin").await;

    let video_id = publish_video(&server, &owner_token, "My first video").await;

    let get = server
        .get(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&other_token)
        .await;
    assert_eq!(get.status_code(), StatusCode::OK);
    let video: serde_json::Value = get.json();
    assert_eq!(video["title"], "My first video");
    assert_eq!(video["views"], 1);
    assert_eq!(video["owner"]["id"].as_str().unwrap(), owner_id);

    // Non-owner cannot mutate
    let forbidden = server
        .put(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&other_token)
        .json(&json!({ "title": "Hijacked", "description": "nope" }))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let updated = server
        .put(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&owner_token)
        .json(&json!({ "title": "Renamed", "description": "Still mine" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated: serde_json::Value = updated.json();
    assert_eq!(updated["title"], "Renamed");

    // Missing resource beats ownership: unknown id is 404 for anyone
    let missing = server
        .delete("/api/videos/does-not-exist")
        .authorization_bearer(&other_token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let deleted = server
        .delete(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&owner_token)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let gone = server
        .get(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&owner_token)
        .await;
    assert_eq!(gone.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpublished_videos_are_hidden() {
    let (server, _temp) = setup_test_server().await;
    let (owner_token, _) = register_and_login(&server, "frank").await;
    let (viewer_token, _) = register_and_login(&server, "grace").await;

    let video_id = publish_video(&server, &owner_token, "Soon unlisted").await;

    let toggled = server
        .put(&format!("/api/videos/{}/toggle-publish", video_id))
        .authorization_bearer(&owner_token)
        .await;
    assert_eq!(toggled.status_code(), StatusCode::OK);
    let body: serde_json::Value = toggled.json();
    assert_eq!(body["is_published"], false);

    let listing = server
        .get("/api/videos")
        .authorization_bearer(&viewer_token)
        .await;
    let listing: serde_json::Value = listing.json();
    assert_eq!(listing["total_videos"], 0);

    let hidden = server
        .get(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&viewer_token)
        .await;
    assert_eq!(hidden.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_video_listing_pagination_and_sort() {
    let (server, _temp) = setup_test_server().await;
    let (token, _) = register_and_login(&server, "heidi").await;

    for i in 0..15 {
        publish_video(&server, &token, &format!("Clip {:02}", i)).await;
    }

    let page2 = server
        .get("/api/videos?page=2&limit=10")
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = page2.json();
    assert_eq!(body["total_videos"], 15);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["videos"].as_array().unwrap().len(), 5);

    // Out-of-range and garbage params fall back to defaults
    let lenient = server
        .get("/api/videos?page=0&limit=abc")
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = lenient.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["videos"].as_array().unwrap().len(), 10);

    // Unknown sort keys fall back to creation time descending
    let sorted = server
        .get("/api/videos?sort_by=evil")
        .authorization_bearer(&token)
        .await;
    assert_eq!(sorted.status_code(), StatusCode::OK);

    let by_query = server
        .get("/api/videos?query=clip%2003")
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = by_query.json();
    assert_eq!(body["total_videos"], 1);
}

#[tokio::test]
async fn test_like_toggle_parity() {
    let (server, _temp) = setup_test_server().await;
    let (token, _) = register_and_login(&server, "ivan").await;
    let video_id = publish_video(&server, &token, "Likeable").await;

    let first = server
        .post(&format!("/api/likes/video/{}", video_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body: serde_json::Value = first.json();
    assert_eq!(body["is_liked"], true);
    assert_eq!(body["like_count"], 1);

    let second = server
        .post(&format!("/api/likes/video/{}", video_id))
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = second.json();
    assert_eq!(body["is_liked"], false);
    assert_eq!(body["like_count"], 0);

    let missing = server
        .post("/api/likes/video/no-such-video")
        .authorization_bearer(&token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_liked_videos_listing() {
    let (server, _temp) = setup_test_server().await;
    let (owner_token, _) = register_and_login(&server, "judy").await;
    let (fan_token, _) = register_and_login(&server, "kevin").await;

    let first = publish_video(&server, &owner_token, "First").await;
    let second = publish_video(&server, &owner_token, "Second").await;

    for id in [&first, &second] {
        let response = server
            .post(&format!("/api/likes/video/{}", id))
            .authorization_bearer(&fan_token)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let liked = server
        .get("/api/likes/videos")
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = liked.json();
    assert_eq!(body["total_videos"], 2);

    // A deleted video drops out of the liked listing
    let deleted = server
        .delete(&format!("/api/videos/{}", first))
        .authorization_bearer(&owner_token)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let liked = server
        .get("/api/likes/videos")
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = liked.json();
    assert_eq!(body["total_videos"], 1);
    assert_eq!(body["videos"][0]["title"], "Second");
}

#[tokio::test]
async fn test_comment_validation_and_pagination() {
    let (server, _temp) = setup_test_server().await;
    let (token, _) = register_and_login(&server, "laura").await;
    let video_id = publish_video(&server, &token, "Discussed").await;

    let blank = server
        .post(&format!("/api/videos/{}/comments", video_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": "   " }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    for i in 0..25 {
        let response = server
            .post(&format!("/api/videos/{}/comments", video_id))
            .authorization_bearer(&token)
            .json(&json!({ "content": format!("Comment {}", i) }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let page2 = server
        .get(&format!("/api/videos/{}/comments?page=2&limit=10", video_id))
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = page2.json();
    assert_eq!(body["total_comments"], 25);
    assert_eq!(body["comments"].as_array().unwrap().len(), 10);

    // The denormalized counter followed along
    let video = server
        .get(&format!("/api/videos/{}", video_id))
        .authorization_bearer(&token)
        .await;
    let video: serde_json::Value = video.json();
    assert_eq!(video["comment_count"], 25);

    let missing = server
        .get("/api/videos/no-such-video/comments")
        .authorization_bearer(&token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_is_trimmed_and_blank_updates_rejected() {
    let (server, _temp) = setup_test_server().await;
    let (token, _) = register_and_login(&server, "wendy").await;
    let video_id = publish_video(&server, &token, "Sanitized").await;

    // Padding is stripped before storage
    let created = server
        .post(&format!("/api/videos/{}/comments", video_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": "  padded comment  " }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let comment: serde_json::Value = created.json();
    assert_eq!(comment["content"], "padded comment");
    let comment_id = comment["id"].as_str().unwrap();

    // A whitespace-only update is rejected, not stored as empty
    let blank_update = server
        .put(&format!("/api/videos/{}/comments/{}", video_id, comment_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": " \t\n " }))
        .await;
    assert_eq!(blank_update.status_code(), StatusCode::BAD_REQUEST);

    let updated = server
        .put(&format!("/api/videos/{}/comments/{}", video_id, comment_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": "\tedited\n" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated: serde_json::Value = updated.json();
    assert_eq!(updated["content"], "edited");

    // Same rules on tweets
    let tweet = server
        .post("/api/tweets")
        .authorization_bearer(&token)
        .json(&json!({ "content": "  short thought  " }))
        .await;
    assert_eq!(tweet.status_code(), StatusCode::CREATED);
    let tweet: serde_json::Value = tweet.json();
    assert_eq!(tweet["content"], "short thought");
    let tweet_id = tweet["id"].as_str().unwrap();

    let blank_tweet = server
        .put(&format!("/api/tweets/{}", tweet_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": "   " }))
        .await;
    assert_eq!(blank_tweet.status_code(), StatusCode::BAD_REQUEST);

    let updated_tweet = server
        .put(&format!("/api/tweets/{}", tweet_id))
        .authorization_bearer(&token)
        .json(&json!({ "content": " revised thought " }))
        .await;
    assert_eq!(updated_tweet.status_code(), StatusCode::OK);
    let updated_tweet: serde_json::Value = updated_tweet.json();
    assert_eq!(updated_tweet["content"], "revised thought");
}

#[tokio::test]
async fn test_comment_membership_and_ownership_checks() {
    let (server, _temp) = setup_test_server().await;
    let (author_token, _) = register_and_login(&server, "mallory").await;
    let (other_token, _) = register_and_login(&server, "nina").await;

    let video_a = publish_video(&server, &author_token, "Video A").await;
    let video_b = publish_video(&server, &author_token, "Video B").await;

    let created = server
        .post(&format!("/api/videos/{}/comments", video_a))
        .authorization_bearer(&author_token)
        .json(&json!({ "content": "On video A" }))
        .await;
    let comment: serde_json::Value = created.json();
    let comment_id = comment["id"].as_str().unwrap();

    // Wrong parent video: membership failure, not a 404
    let mismatched = server
        .put(&format!("/api/videos/{}/comments/{}", video_b, comment_id))
        .authorization_bearer(&author_token)
        .json(&json!({ "content": "moved?" }))
        .await;
    assert_eq!(mismatched.status_code(), StatusCode::BAD_REQUEST);

    // Missing comment on the right video is a 404
    let missing = server
        .put(&format!("/api/videos/{}/comments/no-such-comment", video_a))
        .authorization_bearer(&author_token)
        .json(&json!({ "content": "ghost" }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    // Someone else's comment is a 403
    let forbidden = server
        .delete(&format!("/api/videos/{}/comments/{}", video_a, comment_id))
        .authorization_bearer(&other_token)
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let deleted = server
        .delete(&format!("/api/videos/{}/comments/{}", video_a, comment_id))
        .authorization_bearer(&author_token)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_subscription_toggle_and_listings() {
    let (server, _temp) = setup_test_server().await;
    let (channel_token, channel_id) = register_and_login(&server, "oscar").await;
    let (fan_token, fan_id) = register_and_login(&server, "peggy").await;

    let self_sub = server
        .post(&format!("/api/subscriptions/{}", channel_id))
        .authorization_bearer(&channel_token)
        .await;
    assert_eq!(self_sub.status_code(), StatusCode::BAD_REQUEST);

    let missing = server
        .post("/api/subscriptions/no-such-channel")
        .authorization_bearer(&fan_token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let subscribed = server
        .post(&format!("/api/subscriptions/{}", channel_id))
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = subscribed.json();
    assert_eq!(body["is_subscribed"], true);

    let subscribers = server
        .get(&format!("/api/channels/{}/subscribers", channel_id))
        .authorization_bearer(&channel_token)
        .await;
    let body: serde_json::Value = subscribers.json();
    assert_eq!(body["total_subscribers"], 1);
    assert_eq!(body["subscribers"][0]["subscriber"]["id"].as_str().unwrap(), fan_id);

    let channels = server
        .get(&format!("/api/users/{}/subscriptions", fan_id))
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = channels.json();
    assert_eq!(body["total_subscriptions"], 1);

    // Channel profile reflects the subscription from the fan's view
    let profile = server
        .get("/api/users/c/oscar")
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = profile.json();
    assert_eq!(body["subscriber_count"], 1);
    assert_eq!(body["is_subscribed"], true);

    let unsubscribed = server
        .post(&format!("/api/subscriptions/{}", channel_id))
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = unsubscribed.json();
    assert_eq!(body["is_subscribed"], false);
}

#[tokio::test]
async fn test_playlist_name_conflicts_and_video_membership() {
    let (server, _temp) = setup_test_server().await;
    let (token, user_id) = register_and_login(&server, "quentin").await;

    let favorites = server
        .post("/api/playlists")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Favorites" }))
        .await;
    assert_eq!(favorites.status_code(), StatusCode::CREATED);
    let favorites: serde_json::Value = favorites.json();

    let duplicate = server
        .post("/api/playlists")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Favorites" }))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

    let watch_later = server
        .post("/api/playlists")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Watch Later" }))
        .await;
    let watch_later: serde_json::Value = watch_later.json();
    let watch_later_id = watch_later["id"].as_str().unwrap();

    // Renaming onto an existing name conflicts; renaming elsewhere is fine
    let clash = server
        .put(&format!("/api/playlists/{}", watch_later_id))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Favorites" }))
        .await;
    assert_eq!(clash.status_code(), StatusCode::CONFLICT);

    let renamed = server
        .put(&format!("/api/playlists/{}", watch_later_id))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Later" }))
        .await;
    assert_eq!(renamed.status_code(), StatusCode::OK);

    // Re-saving under its own unchanged name is not a conflict
    let same_name = server
        .put(&format!("/api/playlists/{}", watch_later_id))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Later", "description": "updated" }))
        .await;
    assert_eq!(same_name.status_code(), StatusCode::OK);

    let video_id = publish_video(&server, &token, "Playlisted").await;
    let favorites_id = favorites["id"].as_str().unwrap();

    let added = server
        .post(&format!("/api/playlists/{}/videos/{}", favorites_id, video_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(added.status_code(), StatusCode::OK);

    // Adding twice does not duplicate
    let added_again = server
        .post(&format!("/api/playlists/{}/videos/{}", favorites_id, video_id))
        .authorization_bearer(&token)
        .await;
    let playlist: serde_json::Value = added_again.json();
    assert_eq!(playlist["videos"].as_array().unwrap().len(), 1);

    let resolved = server
        .get(&format!("/api/playlists/{}", favorites_id))
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = resolved.json();
    assert_eq!(body["videos"][0]["title"], "Playlisted");
    assert_eq!(body["owner"]["id"].as_str().unwrap(), user_id);

    // Removing an absent video is a no-op success
    let removed = server
        .delete(&format!("/api/playlists/{}/videos/{}", favorites_id, video_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(removed.status_code(), StatusCode::OK);
    let removed_again = server
        .delete(&format!("/api/playlists/{}/videos/{}", favorites_id, video_id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(removed_again.status_code(), StatusCode::OK);

    let listing = server
        .get(&format!("/api/users/{}/playlists", user_id))
        .authorization_bearer(&token)
        .await;
    let body: serde_json::Value = listing.json();
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_tweet_lifecycle() {
    let (server, _temp) = setup_test_server().await;
    let (author_token, author_id) = register_and_login(&server, "rachel").await;
    let (other_token, _) = register_and_login(&server, "steve").await;

    let blank = server
        .post("/api/tweets")
        .authorization_bearer(&author_token)
        .json(&json!({ "content": "  \n " }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let created = server
        .post("/api/tweets")
        .authorization_bearer(&author_token)
        .json(&json!({ "content": "hello world" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let tweet: serde_json::Value = created.json();
    let tweet_id = tweet["id"].as_str().unwrap();
    assert_eq!(tweet["owner"]["id"].as_str().unwrap(), author_id);

    let forbidden = server
        .put(&format!("/api/tweets/{}", tweet_id))
        .authorization_bearer(&other_token)
        .json(&json!({ "content": "not yours" }))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let liked = server
        .post(&format!("/api/likes/tweet/{}", tweet_id))
        .authorization_bearer(&other_token)
        .await;
    let body: serde_json::Value = liked.json();
    assert_eq!(body["is_liked"], true);
    assert_eq!(body["like_count"], 1);

    let listing = server
        .get(&format!("/api/users/{}/tweets", author_id))
        .authorization_bearer(&other_token)
        .await;
    let body: serde_json::Value = listing.json();
    assert_eq!(body["total_tweets"], 1);
    assert_eq!(body["tweets"][0]["like_count"], 1);

    let deleted = server
        .delete(&format!("/api/tweets/{}", tweet_id))
        .authorization_bearer(&author_token)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let missing = server
        .delete(&format!("/api/tweets/{}", tweet_id))
        .authorization_bearer(&author_token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_channel_stats_and_videos() {
    let (server, _temp) = setup_test_server().await;
    let (channel_token, channel_id) = register_and_login(&server, "trent").await;
    let (fan_token, _) = register_and_login(&server, "ursula").await;

    let first = publish_video(&server, &channel_token, "Stats One").await;
    let second = publish_video(&server, &channel_token, "Stats Two").await;

    // One view, two likes, one subscriber
    let viewed = server
        .get(&format!("/api/videos/{}", first))
        .authorization_bearer(&fan_token)
        .await;
    assert_eq!(viewed.status_code(), StatusCode::OK);
    for id in [&first, &second] {
        server
            .post(&format!("/api/likes/video/{}", id))
            .authorization_bearer(&fan_token)
            .await;
    }
    server
        .post(&format!("/api/subscriptions/{}", channel_id))
        .authorization_bearer(&fan_token)
        .await;

    let stats = server
        .get(&format!("/api/channels/{}/stats", channel_id))
        .authorization_bearer(&channel_token)
        .await;
    assert_eq!(stats.status_code(), StatusCode::OK);
    let body: serde_json::Value = stats.json();
    assert_eq!(body["total_videos"], 2);
    assert_eq!(body["total_views"], 1);
    assert_eq!(body["total_subscribers"], 1);
    assert_eq!(body["total_likes"], 2);

    let videos = server
        .get(&format!("/api/channels/{}/videos", channel_id))
        .authorization_bearer(&fan_token)
        .await;
    let body: serde_json::Value = videos.json();
    assert_eq!(body["total_videos"], 2);

    let missing = server
        .get("/api/channels/no-such-channel/stats")
        .authorization_bearer(&fan_token)
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let (server, _temp) = setup_test_server().await;
    let (token, _) = register_and_login(&server, "victor").await;

    let response = server
        .get("/api/videos/no-such-video")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Video not found");
}
