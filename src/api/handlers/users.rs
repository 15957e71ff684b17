// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::api::routes::resolve_pagination;
use crate::auth;
use crate::db::DbPool;
use crate::models::user::{NewUser, User};
use crate::schema::users;

#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    /// Matches against full name, username and email
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

/// Get a list of user accounts with pagination and optional search
pub async fn get_users(
    State(db_pool): State<DbPool>,
    Query(query): Query<UsersQuery>,
) -> (StatusCode, Json<Value>) {
    let (limit, offset) = resolve_pagination(query.limit, query.offset, query.page);

    debug!("Getting users list with limit: {}, offset: {}", limit, offset);

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

    let mut users_query = users::table
        .order_by(users::created_at.desc())
        .into_boxed();

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        users_query = users_query.filter(
            users::full_name
                .ilike(pattern.clone())
                .or(users::username.ilike(pattern.clone()))
                .or(users::email.ilike(pattern)),
        );
    }

    let users_result = users_query
        .limit(limit)
        .offset(offset)
        .load::<User>(&mut conn)
        .await;

    match users_result {
        Ok(users) => (
            StatusCode::OK,
            Json(serde_json::to_value(users).unwrap_or_default()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to fetch users: {}", e)
            })),
        ),
    }
}

/// Get a single user account by id
pub async fn get_user(
    State(db_pool): State<DbPool>,
    Path(id): Path<i32>,
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

    match users::table.find(id).first::<User>(&mut conn).await {
        Ok(user) => (
            StatusCode::OK,
            Json(serde_json::to_value(user).unwrap_or_default()),
        ),
        Err(diesel::result::Error::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "User not found"
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to fetch user: {}", e)
            })),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Defaults to a regular user account
    pub role: Option<String>,
}

/// Create a user account (admin only)
pub async fn create_user(
    State(db_pool): State<DbPool>,
    headers: HeaderMap,
    Json(body): Json<CreateUserRequest>,
) -> (StatusCode, Json<Value>) {
    if let Err(e) = auth::authorize_admin(&headers) {
        return (e.status(), Json(json!({ "error": e.to_string() })));
    }

    let role = body.role.unwrap_or_else(|| "user".to_string());
    if role != "user" && role != auth::ROLE_ADMIN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Role must be 'user' or 'admin'"
            })),
        );
    }

    let password_hash = match auth::hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash password: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to hash password"
                })),
            );
        }
    };

    let new_user = NewUser {
        username: body.username,
        full_name: body.full_name,
        email: body.email,
        password_hash,
        role,
    };

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

    let inserted = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<User>(&mut conn)
        .await;

    match inserted {
        Ok(user) => {
            info!("Created user account {} ({})", user.username, user.id);
            (
                StatusCode::CREATED,
                Json(serde_json::to_value(user).unwrap_or_default()),
            )
        }
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Username or email already taken"
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to create user: {}", e)
            })),
        ),
    }
}

/// Delete a user account and, via foreign keys, their reports and reviews
/// (admin only)
pub async fn delete_user(
    State(db_pool): State<DbPool>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let claims = match auth::authorize_admin(&headers) {
        Ok(claims) => claims,
        Err(e) => return (e.status(), Json(json!({ "error": e.to_string() }))),
    };

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

    match diesel::delete(users::table.find(id)).execute(&mut conn).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "User not found"
            })),
        ),
        Ok(_) => {
            info!("User {} deleted by admin {}", id, claims.username);
            (
                StatusCode::OK,
                Json(json!({
                    "deleted": id
                })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to delete user: {}", e)
            })),
        ),
    }
}
