//! Prometheus metrics for assetmon.
//!
//! Covers:
//! - Pull API requests (count and latency per endpoint)
//! - Push channel connections and inbound message outcomes
//! - Query cache hits, misses and invalidations
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a programming error caught on first use.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge, CounterVec, Encoder,
    HistogramVec, IntGauge, TextEncoder,
};

/// Total pull requests.
/// Labels: endpoint (assets/asset/telemetry/power/configuration/configurations/save),
/// outcome (ok/not_found/validation/error)
pub static PULL_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "assetmon_pull_requests_total",
        "Total pull API requests",
        &["endpoint", "outcome"]
    )
    .unwrap()
});

/// Pull request latency in milliseconds.
pub static PULL_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "assetmon_pull_latency_ms",
        "Pull API request latency in milliseconds",
        &["endpoint"],
        vec![5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]
    )
    .unwrap()
});

/// Currently open live channels.
pub static LIVE_CHANNELS_OPEN: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "assetmon_live_channels_open",
        "Number of open push channel subscriptions"
    )
    .unwrap()
});

/// Push channel connection attempts.
/// Labels: outcome (connected/failed/closed_by_server/no_runtime)
pub static LIVE_CONNECTIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "assetmon_live_connections_total",
        "Push channel connection events",
        &["outcome"]
    )
    .unwrap()
});

/// Inbound push messages.
/// Labels: outcome (applied/other_subject/ignored/malformed)
pub static PUSH_MESSAGES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "assetmon_push_messages_total",
        "Inbound push messages by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Query cache lookups.
/// Labels: result (hit/miss/invalidated)
pub static QUERY_CACHE_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "assetmon_query_cache_total",
        "Query cache lookups and invalidations",
        &["result"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a finished pull request.
    pub fn pull_request(endpoint: &str, outcome: &str, latency_ms: f64) {
        PULL_REQUESTS_TOTAL
            .with_label_values(&[endpoint, outcome])
            .inc();
        PULL_LATENCY_MS
            .with_label_values(&[endpoint])
            .observe(latency_ms);
    }

    /// Record a live channel opened.
    pub fn live_channel_opened() {
        LIVE_CHANNELS_OPEN.inc();
    }

    /// Record a live channel closed.
    pub fn live_channel_closed() {
        LIVE_CHANNELS_OPEN.dec();
    }

    /// Record a push connection event.
    pub fn live_connection(outcome: &str) {
        LIVE_CONNECTIONS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record an inbound push message outcome.
    pub fn push_message(outcome: &str) {
        PUSH_MESSAGES_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn cache_hit() {
        QUERY_CACHE_TOTAL.with_label_values(&["hit"]).inc();
    }

    pub fn cache_miss() {
        QUERY_CACHE_TOTAL.with_label_values(&["miss"]).inc();
    }

    pub fn cache_invalidated() {
        QUERY_CACHE_TOTAL.with_label_values(&["invalidated"]).inc();
    }
}

/// Render the default registry in the Prometheus text format.
pub fn gather_text() -> TelemetryResult<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_message_counter() {
        let before = PUSH_MESSAGES_TOTAL.with_label_values(&["malformed"]).get();
        Metrics::push_message("malformed");
        let after = PUSH_MESSAGES_TOTAL.with_label_values(&["malformed"]).get();
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_gather_text_contains_recorded_metric() {
        Metrics::pull_request("assets", "ok", 12.0);
        let text = gather_text().unwrap();
        assert!(text.contains("assetmon_pull_requests_total"));
        assert!(text.contains("assetmon_pull_latency_ms"));
    }

    #[test]
    fn test_live_channel_gauge() {
        Metrics::live_channel_opened();
        Metrics::live_channel_opened();
        Metrics::live_channel_closed();
        assert!(LIVE_CHANNELS_OPEN.get() >= 1);
        Metrics::live_channel_closed();
    }
}
