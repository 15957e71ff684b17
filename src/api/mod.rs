mod handlers;
mod routes;

use crate::config::Config;
use crate::db::Database;
use crate::metrics;
use anyhow::Result;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Start the API server
pub async fn start_api_server(db: Arc<Database>) -> Result<()> {
    let config = Config::get();

    // Set up CORS
    let cors = if config.api.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::permissive()
    };

    // Create router with all routes
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::get_metrics))
        .route("/login", post(handlers::auth::login))
        // User management routes
        .route(
            "/api/users",
            get(handlers::users::get_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/:id",
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        // Report moderation routes
        .route("/api/reports", get(handlers::reports::get_reports))
        .route(
            "/api/reports/locations",
            get(handlers::reports::get_report_locations),
        )
        .route(
            "/api/reports/:id/status",
            patch(handlers::reports::update_report_status),
        )
        .route("/api/reports/:id", delete(handlers::reports::delete_report))
        // Review routes
        .route("/api/reviews", get(handlers::reviews::get_reviews))
        .route(
            "/api/reviews/summary",
            get(handlers::reviews::get_review_summary),
        )
        .route("/api/reviews/:id", delete(handlers::reviews::delete_review))
        // Dashboard routes
        .route(
            "/api/dashboard/stats",
            get(handlers::dashboard::get_overview_stats),
        )
        .route(
            "/api/dashboard/growth",
            get(handlers::dashboard::get_growth_series),
        )
        // Add state and middleware
        .with_state(db.get_pool().clone())
        .layer(middleware::from_fn(metrics::track_http))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Get bind address
    let addr = format!("{}:{}", config.api.host, config.api.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
