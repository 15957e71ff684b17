// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::{header, HeaderMap, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub const ROLE_ADMIN: &str = "admin";

/// Claims carried by an admin session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub username: String,
    pub role: String,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("admin role required")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// Issue a signed session token for a logged-in user
pub fn create_token(user_id: i32, username: &str, role: &str) -> Result<String> {
    let config = Config::get();
    let expiry = Utc::now() + Duration::hours(config.auth.token_expiry_hours);
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role: role.to_string(),
        exp: expiry.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Failed to sign token: {}", e))
}

/// Validate a bearer token from request headers and require the admin role
pub fn authorize_admin(headers: &HeaderMap) -> Result<Claims, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?;

    let config = Config::get();
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AuthError::InvalidToken)?;

    if data.claims.role != ROLE_ADMIN {
        return Err(AuthError::Forbidden);
    }

    Ok(data.claims)
}

/// Hash a password into a PHC string for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

/// Check a password against a stored PHC hash. An unparseable stored hash
/// counts as a failed verification rather than an error.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn garbage_stored_hash_fails_verification() {
        assert!(!verify_password("not-a-phc-string", "whatever"));
    }

    #[test]
    fn token_round_trip_requires_admin_role() {
        let token = create_token(1, "admin", ROLE_ADMIN).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        let claims = authorize_admin(&headers).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.username, "admin");

        let citizen = create_token(2, "citizen", "user").unwrap();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {citizen}")).unwrap(),
        );
        assert!(matches!(
            authorize_admin(&headers),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn missing_or_mangled_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            authorize_admin(&headers),
            Err(AuthError::MissingToken)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(matches!(
            authorize_admin(&headers),
            Err(AuthError::MissingToken)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not.a.jwt"),
        );
        assert!(matches!(
            authorize_admin(&headers),
            Err(AuthError::InvalidToken)
        ));
    }
}
