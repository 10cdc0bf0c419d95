//! Credential service and bearer-token middleware.
//!
//! Password hashing and token issuance live here as free functions over the
//! user record; the entity model itself stays plain data.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user::User, AppState};

/// Access-token claims, installed as a request extension by [`require_auth`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn create_access_token(config: &Config, user: &User) -> Result<String, AppError> {
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::minutes(config.access_token_ttl_mins))
            .timestamp() as usize,
    };
    sign(config, &claims)
}

pub fn create_refresh_token(config: &Config, user_id: &str) -> Result<String, AppError> {
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(config.refresh_token_ttl_days))
            .timestamp() as usize,
    };
    sign(config, &claims)
}

pub fn decode_refresh_token(config: &Config, token: &str) -> Result<RefreshClaims, AppError> {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))
}

fn sign<T: Serialize>(config: &Config, claims: &T) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token generation failed: {}", e)))
}

/// Extract and validate the bearer token, installing the claims for
/// downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    req.extensions_mut().insert(data.claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            db_path: "/tmp/streamhub-test".to_string(),
            port: 0,
            max_body_size: 1024,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_mins: 5,
            refresh_token_ttl_days: 1,
        }
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_access_token_roundtrip() {
        let config = test_config();
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "Alice".to_string(),
            "hash".to_string(),
            None,
            None,
        );
        let token = create_access_token(&config, &user).unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, user.id);
        assert_eq!(decoded.claims.username, "alice");
    }

    #[test]
    fn test_refresh_token_rejects_wrong_secret() {
        let config = test_config();
        let token = create_refresh_token(&config, "user-1").unwrap();
        assert_eq!(decode_refresh_token(&config, &token).unwrap().sub, "user-1");

        let mut other = test_config();
        other.jwt_secret = "different-secret".to_string();
        assert!(matches!(
            decode_refresh_token(&other, &token).unwrap_err(),
            AppError::Unauthorized(_)
        ));
    }
}
