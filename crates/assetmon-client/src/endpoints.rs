//! Endpoint paths and push channel address.

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Path of the telemetry push channel, relative to the API base.
pub const TELEMETRY_WS_PATH: &str = "/ws/telemetry";

/// Derive the push channel URL from the pull API base URL.
///
/// Only the scheme changes (`http` -> `ws`, `https` -> `wss`); host, port
/// and any base path are kept, then [`TELEMETRY_WS_PATH`] is appended.
pub fn telemetry_ws_url(api_base: &str) -> String {
    let base = api_base.trim().trim_end_matches('/');
    let base = match base.strip_prefix("http") {
        Some(rest) => format!("ws{rest}"),
        None => base.to_string(),
    };
    format!("{base}{TELEMETRY_WS_PATH}")
}
