// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use prometheus::{Encoder, TextEncoder};
use tracing::error;

use crate::metrics::REGISTRY;

/// Prometheus text exposition of the admin API metrics
pub async fn get_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new());
    }

    match String::from_utf8(buffer) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Metrics buffer was not valid UTF-8: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::HTTP_REQUESTS;

    #[test]
    fn exposition_contains_registered_counters() {
        HTTP_REQUESTS.with_label_values(&["GET", "/health", "200"]).inc();
        let (status, body) = tokio_test::block_on(get_metrics());
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("http_requests_total"));
    }
}
