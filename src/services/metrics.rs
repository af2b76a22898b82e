//! Request metrics for the validation endpoint.
//!
//! The recorder is owned by `Metrics` (not installed as the global `metrics`
//! recorder), so each `AppState` carries its own registry and tests can read
//! what a router recorded.

use std::time::Duration;

use axum::http::StatusCode;
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const VALIDATION_TIME: &str = "nginx_subrequest_auth_jwt_token_validation_time_seconds";

// Statuses the validate endpoint can answer with; visible at zero from startup.
const KNOWN_STATUSES: [StatusCode; 4] = [
    StatusCode::OK,
    StatusCode::UNAUTHORIZED,
    StatusCode::METHOD_NOT_ALLOWED,
    StatusCode::INTERNAL_SERVER_ERROR,
];

/// `count` buckets starting at `start`, each `factor` times the previous one.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Vec<f64> {
    std::iter::successors(Some(start), |b| Some(b * factor))
        .take(count)
        .collect()
}

pub struct Metrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    pub fn new() -> Result<Self, BuildError> {
        // 100ns, x3, 6 buckets
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(VALIDATION_TIME.to_string()),
                &exponential_buckets(100e-9, 3.0, 6),
            )?
            .build_recorder();
        let handle = recorder.handle();

        recorder.describe_counter(
            KeyName::from_const_str(REQUESTS_TOTAL),
            None,
            SharedString::const_str("Total number of http requests handled"),
        );
        recorder.describe_histogram(
            KeyName::from_const_str(VALIDATION_TIME),
            None,
            SharedString::const_str("Number of seconds spent validating token"),
        );

        let metrics = Self { recorder, handle };
        for status in KNOWN_STATUSES {
            metrics.requests(status).increment(0);
        }
        Ok(metrics)
    }

    fn metadata() -> Metadata<'static> {
        Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
    }

    fn requests(&self, status: StatusCode) -> metrics::Counter {
        let key = Key::from_parts(
            REQUESTS_TOTAL,
            vec![Label::new("status", status.as_str().to_string())],
        );
        self.recorder.register_counter(&key, &Self::metadata())
    }

    pub fn record_status(&self, status: StatusCode) {
        self.requests(status).increment(1);
    }

    pub fn observe_validation(&self, elapsed: Duration) {
        let key = Key::from_static_name(VALIDATION_TIME);
        self.recorder
            .register_histogram(&key, &Self::metadata())
            .record(elapsed.as_secs_f64());
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}
