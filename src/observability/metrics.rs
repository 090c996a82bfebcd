//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_admissions_total` (counter): admission attempts by outcome
//! - `gateway_cors_rejections_total` (counter): requests from unlisted origins
//! - `gateway_reboot_alerts_total` (counter): reboot broadcasts sent
//! - `gateway_active_sessions` (gauge): sessions held by the local hub

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_admission(outcome: &'static str) {
    counter!("gateway_admissions_total", "outcome" => outcome).increment(1);
}

pub fn record_cors_rejection() {
    counter!("gateway_cors_rejections_total").increment(1);
}

pub fn record_reboot_alert() {
    counter!("gateway_reboot_alerts_total").increment(1);
}

pub fn set_active_sessions(count: usize) {
    gauge!("gateway_active_sessions").set(count as f64);
}

/// Middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
