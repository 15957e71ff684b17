// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::db::DbPool;
use crate::models::report::{ReportStatus, Severity};
use crate::schema::{reports, users};
use crate::stats::{self, Granularity};

/// Get the overview card numbers for the dashboard landing page
pub async fn get_overview_stats(State(db_pool): State<DbPool>) -> (StatusCode, Json<Value>) {
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

    let total_users = users::table
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .unwrap_or(0);

    let total_reports = reports::table
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .unwrap_or(0);

    let serious_count = reports::table
        .filter(reports::severity.eq(Severity::Serious.as_str()))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .unwrap_or(0);

    let pending_count = reports::table
        .filter(reports::status.eq(ReportStatus::Pending.as_str()))
        .count()
        .get_result::<i64>(&mut conn)
        .await
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(json!({
            "total_users": total_users,
            "total_reports": total_reports,
            "serious_count": serious_count,
            "pending_count": pending_count,
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct GrowthQuery {
    /// One of daily, weekly, monthly, all; defaults to daily
    pub granularity: Option<String>,
}

/// Get the growth chart series: per-bucket counts of user registrations and
/// report submissions. Recomputed from the raw rows on every call.
pub async fn get_growth_series(
    State(db_pool): State<DbPool>,
    Query(query): Query<GrowthQuery>,
) -> (StatusCode, Json<Value>) {
    let granularity = match query
        .granularity
        .as_deref()
        .unwrap_or("daily")
        .parse::<Granularity>()
    {
        Ok(granularity) => granularity,
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

    let user_times = match users::table
        .select(users::created_at)
        .load::<NaiveDateTime>(&mut conn)
        .await
    {
        Ok(times) => times,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch registration times: {}", e)
                })),
            )
        }
    };

    let report_times = match reports::table
        .select(reports::created_at)
        .load::<NaiveDateTime>(&mut conn)
        .await
    {
        Ok(times) => times,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch submission times: {}", e)
                })),
            )
        }
    };

    debug!(
        "Bucketing {} registrations and {} submissions",
        user_times.len(),
        report_times.len()
    );

    let user_raw: Vec<String> = user_times
        .iter()
        .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
        .collect();
    let report_raw: Vec<String> = report_times
        .iter()
        .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
        .collect();

    let series = stats::growth_series(
        user_raw.iter().map(String::as_str),
        report_raw.iter().map(String::as_str),
        granularity,
    );

    (
        StatusCode::OK,
        Json(serde_json::to_value(series).unwrap_or_default()),
    )
}
