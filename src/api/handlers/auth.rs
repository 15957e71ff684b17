// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::auth;
use crate::db::DbPool;
use crate::models::user::User;
use crate::schema::users;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub username: String,
    pub password: String,
}

/// Log an administrator in and hand back a session token
pub async fn login(
    State(db_pool): State<DbPool>,
    Json(body): Json<LoginRequest>,
) -> (StatusCode, Json<Value>) {
    let mut conn = match db_pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Database connection error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Database error: {}", e)
                })),
            );
        }
    };

    let user_result = users::table
        .filter(
            users::username
                .eq(&body.username)
                .or(users::email.eq(&body.username)),
        )
        .first::<User>(&mut conn)
        .await;

    let user = match user_result {
        Ok(user) => user,
        Err(diesel::result::Error::NotFound) => {
            warn!("Login attempt for unknown account: {}", body.username);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid username or password"
                })),
            );
        }
        Err(e) => {
            error!("Failed to look up account: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to look up account: {}", e)
                })),
            );
        }
    };

    if !auth::verify_password(&user.password_hash, &body.password) {
        warn!("Failed password check for account: {}", user.username);
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid username or password"
            })),
        );
    }

    if user.role != auth::ROLE_ADMIN {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Admin access required"
            })),
        );
    }

    let token = match auth::create_token(user.id, &user.username, &user.role) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to issue session token: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to issue session token"
                })),
            );
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "id": user.id,
            "username": user.username,
            "full_name": user.full_name,
            "email": user.email,
            "role": user.role,
            "token": token,
        })),
    )
}
