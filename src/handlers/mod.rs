//! HTTP handlers, one module per resource.

/// Comment endpoints.
pub mod comment;
/// Channel dashboard endpoints.
pub mod dashboard;
/// Liveness endpoint.
pub mod healthcheck;
/// Like toggle and listing endpoints.
pub mod like;
/// Playlist endpoints.
pub mod playlist;
/// Subscription endpoints.
pub mod subscription;
/// Tweet endpoints.
pub mod tweet;
/// Registration, login, and profile endpoints.
pub mod user;
/// Video endpoints.
pub mod video;

use std::collections::HashMap;

use crate::{db::Database, error::AppError, models::user::OwnerRef};

/// Batch-resolve owner identities for a set of user ids: the one hop of
/// denormalization every listing performs.
pub(crate) fn resolve_owners(
    db: &Database,
    ids: impl IntoIterator<Item = String>,
) -> Result<HashMap<String, OwnerRef>, AppError> {
    let users = db.users.get_many(ids)?;
    Ok(users
        .into_iter()
        .map(|(id, user)| (id, OwnerRef::from(&user)))
        .collect())
}
