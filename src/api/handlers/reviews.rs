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
use crate::models::review::{RatingSummary, ReviewWithUser};
use crate::schema::{reviews, users};

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

/// Get citizen reviews joined with the reviewer's account, newest first
pub async fn get_reviews(
    State(db_pool): State<DbPool>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<Vec<ReviewWithUser>>, StatusCode> {
    let (limit, offset) = resolve_pagination(query.limit, query.offset, query.page);

    debug!("Getting reviews list with limit: {}, offset: {}", limit, offset);

    let mut conn = db_pool.get().await.map_err(|e| {
        error!("Failed to get database connection: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let reviews = reviews::table
        .inner_join(users::table)
        .select((
            reviews::id,
            reviews::user_id,
            users::username,
            users::full_name,
            reviews::rating,
            reviews::comment,
            reviews::created_at,
        ))
        .order_by(reviews::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<ReviewWithUser>(&mut conn)
        .await
        .map_err(|e| {
            error!("Failed to fetch reviews: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(reviews))
}

/// Get the aggregates for the review analytics cards
pub async fn get_review_summary(
    State(db_pool): State<DbPool>,
) -> Result<Json<RatingSummary>, StatusCode> {
    let mut conn = db_pool.get().await.map_err(|e| {
        error!("Failed to get database connection: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let ratings = reviews::table
        .select(reviews::rating)
        .load::<i16>(&mut conn)
        .await
        .map_err(|e| {
            error!("Failed to fetch ratings: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(RatingSummary::from_ratings(&ratings)))
}

/// Delete a review (admin only)
pub async fn delete_review(
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

    match diesel::delete(reviews::table.find(id)).execute(&mut conn).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Review not found"
            })),
        ),
        Ok(_) => {
            info!("Review {} deleted by admin {}", id, claims.username);
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
                "error": format!("Failed to delete review: {}", e)
            })),
        ),
    }
}
