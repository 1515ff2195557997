//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vsum_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsum_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsum_http_requests_in_flight";

    // Artifact metrics
    pub const READINESS_CHECKS_TOTAL: &str = "vsum_readiness_checks_total";
    pub const RESULTS_ASSEMBLED_TOTAL: &str = "vsum_results_assembled_total";

    // Upload metrics
    pub const UPLOADS_TOTAL: &str = "vsum_uploads_total";
    pub const DOWNLOAD_DURATION_SECONDS: &str = "vsum_download_duration_seconds";
    pub const UPLOAD_DURATION_SECONDS: &str = "vsum_upload_duration_seconds";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vsum_rate_limit_hits_total";
}

/// Label used for requests that matched no route.
const UNMATCHED_PATH: &str = "unmatched";

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a readiness check outcome (`ready`, `pending` or `error`).
pub fn record_readiness_check(outcome: &'static str) {
    counter!(names::READINESS_CHECKS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a result assembly outcome.
pub fn record_result_assembly(outcome: &'static str) {
    counter!(names::RESULTS_ASSEMBLED_TOTAL, "outcome" => outcome).increment(1);
}

/// Record an upload attempt outcome.
pub fn record_upload(outcome: &'static str) {
    counter!(names::UPLOADS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record download duration.
pub fn record_download_duration(duration_secs: f64) {
    histogram!(names::DOWNLOAD_DURATION_SECONDS).record(duration_secs);
}

/// Record upload duration.
pub fn record_upload_duration(duration_secs: f64) {
    histogram!(names::UPLOAD_DURATION_SECONDS).record(duration_secs);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Path label for a request: the route template when one matched.
fn path_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = path_label(request.extensions().get::<MatchedPath>());
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_paths_collapse_to_one_label() {
        assert_eq!(path_label(None), "unmatched");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_readiness_check("pending");
        record_result_assembly("ok");
        record_upload("error");
        record_download_duration(1.5);
        record_rate_limit_hit("/api/uploads");
    }
}
