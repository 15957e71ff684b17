// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::api::routes::resolve_pagination;
use crate::auth;
use crate::db::DbPool;
use crate::models::report::{ReportStatus, ReportWithUser, Severity};
use crate::schema::{reports, users};

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    /// Matches against caption and reporter username
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
}

/// Get incoming reports with pagination, text search, date range and
/// location/severity/status filters
pub async fn get_reports(
    State(db_pool): State<DbPool>,
    Query(query): Query<ReportsQuery>,
) -> (StatusCode, Json<Value>) {
    let (limit, offset) = resolve_pagination(query.limit, query.offset, query.page);

    // Validate enum-valued filters before touching the database
    let severity = match query.severity.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<Severity>() {
            Ok(severity) => Some(severity),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.to_string() })),
                )
            }
        },
        None => None,
    };
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<ReportStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.to_string() })),
                )
            }
        },
        None => None,
    };

    debug!("Getting reports list with limit: {}, offset: {}", limit, offset);

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

    // Build the base query with the reporter joined in
    let mut reports_query = reports::table
        .inner_join(users::table)
        .select((
            reports::id,
            reports::user_id,
            users::username,
            reports::caption,
            reports::image_url,
            reports::severity,
            reports::status,
            reports::lat,
            reports::lng,
            reports::province,
            reports::city,
            reports::district,
            reports::created_at,
        ))
        .order_by(reports::created_at.desc())
        .into_boxed();

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        reports_query = reports_query.filter(
            reports::caption
                .ilike(pattern.clone())
                .or(users::username.ilike(pattern)),
        );
    }
    if let Some(start) = query.start_date {
        reports_query = reports_query.filter(reports::created_at.ge(start.and_time(NaiveTime::MIN)));
    }
    if let Some(end) = query.end_date.and_then(|d| d.succ_opt()) {
        reports_query = reports_query.filter(reports::created_at.lt(end.and_time(NaiveTime::MIN)));
    }
    if let Some(province) = query.province.filter(|s| !s.is_empty()) {
        reports_query = reports_query.filter(reports::province.eq(province));
    }
    if let Some(city) = query.city.filter(|s| !s.is_empty()) {
        reports_query = reports_query.filter(reports::city.eq(city));
    }
    if let Some(district) = query.district.filter(|s| !s.is_empty()) {
        reports_query = reports_query.filter(reports::district.eq(district));
    }
    if let Some(severity) = severity {
        reports_query = reports_query.filter(reports::severity.eq(severity.as_str()));
    }
    if let Some(status) = status {
        reports_query = reports_query.filter(reports::status.eq(status.as_str()));
    }

    let reports_result = reports_query
        .limit(limit)
        .offset(offset)
        .load::<ReportWithUser>(&mut conn)
        .await;

    match reports_result {
        Ok(reports) => (
            StatusCode::OK,
            Json(serde_json::to_value(reports).unwrap_or_default()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to fetch reports: {}", e)
            })),
        ),
    }
}

/// Distinct location values feeding the map filter dropdowns
#[derive(Debug, Serialize)]
pub struct LocationOptions {
    pub provinces: Vec<String>,
    pub cities: Vec<String>,
    pub districts: Vec<String>,
}

/// Get the distinct provinces/cities/districts present in the reports
pub async fn get_report_locations(
    State(db_pool): State<DbPool>,
) -> Result<Json<LocationOptions>, StatusCode> {
    let mut conn = db_pool.get().await.map_err(|e| {
        error!("Failed to get database connection: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let provinces = reports::table
        .select(reports::province)
        .distinct()
        .order_by(reports::province.asc())
        .load::<String>(&mut conn)
        .await
        .map_err(|e| {
            error!("Failed to fetch provinces: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let cities = reports::table
        .select(reports::city)
        .distinct()
        .order_by(reports::city.asc())
        .load::<String>(&mut conn)
        .await
        .map_err(|e| {
            error!("Failed to fetch cities: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let districts = reports::table
        .select(reports::district)
        .distinct()
        .order_by(reports::district.asc())
        .load::<String>(&mut conn)
        .await
        .map_err(|e| {
            error!("Failed to fetch districts: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(LocationOptions {
        provinces,
        cities,
        districts,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Move a report through the moderation workflow (admin only)
pub async fn update_report_status(
    State(db_pool): State<DbPool>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(body): Json<UpdateStatusRequest>,
) -> (StatusCode, Json<Value>) {
    let claims = match auth::authorize_admin(&headers) {
        Ok(claims) => claims,
        Err(e) => return (e.status(), Json(json!({ "error": e.to_string() }))),
    };

    let next = match body.status.parse::<ReportStatus>() {
        Ok(status) => status,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        }
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

    let stored = match reports::table
        .find(id)
        .select(reports::status)
        .first::<String>(&mut conn)
        .await
    {
        Ok(status) => status,
        Err(diesel::result::Error::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Report not found"
                })),
            )
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch report: {}", e)
                })),
            )
        }
    };

    let current = match stored.parse::<ReportStatus>() {
        Ok(status) => status,
        Err(e) => {
            error!("Report {} has an unexpected stored status: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Report has an unexpected stored status"
                })),
            );
        }
    };

    if !current.can_transition_to(next) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": format!(
                    "Cannot move report from '{}' to '{}'",
                    current.as_str(),
                    next.as_str()
                )
            })),
        );
    }

    match diesel::update(reports::table.find(id))
        .set(reports::status.eq(next.as_str()))
        .execute(&mut conn)
        .await
    {
        Ok(_) => {
            info!(
                "Report {} moved from '{}' to '{}' by admin {}",
                id,
                current.as_str(),
                next.as_str(),
                claims.username
            );
            (
                StatusCode::OK,
                Json(json!({
                    "id": id,
                    "status": next.as_str(),
                })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to update report: {}", e)
            })),
        ),
    }
}

/// Delete a report (admin only)
pub async fn delete_report(
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

    match diesel::delete(reports::table.find(id)).execute(&mut conn).await {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Report not found"
            })),
        ),
        Ok(_) => {
            info!("Report {} deleted by admin {}", id, claims.username);
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
                "error": format!("Failed to delete report: {}", e)
            })),
        ),
    }
}
