pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod stats;
