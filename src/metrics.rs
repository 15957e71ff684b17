// Copyright (c) SmartInfra Team
// SPDX-License-Identifier: Apache-2.0

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{opts, IntCounterVec, Registry};

/// Process-wide metrics registry exposed at /metrics
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        opts!("http_requests_total", "HTTP requests served by the admin API"),
        &["method", "path", "status"],
    )
    .expect("http_requests_total counter definition is valid");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("http_requests_total registers once");
    counter
});

/// Axum middleware that counts every request by method, path and status
pub async fn track_http<B>(req: Request<B>, next: Next<B>) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    HTTP_REQUESTS
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_tracks_labelled_requests() {
        HTTP_REQUESTS.with_label_values(&["GET", "/api/users", "200"]).inc();
        let before = HTTP_REQUESTS
            .with_label_values(&["GET", "/api/users", "200"])
            .get();
        HTTP_REQUESTS.with_label_values(&["GET", "/api/users", "200"]).inc();
        let after = HTTP_REQUESTS
            .with_label_values(&["GET", "/api/users", "200"])
            .get();
        assert_eq!(after, before + 1);
    }
}
