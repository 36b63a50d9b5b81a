//! Mock monitoring API for integration tests.
//!
//! Serves a fixed asset catalog and an in-memory configuration store, and
//! counts requests per route so cache behavior can be checked.

use assetmon_core::{AssetConfiguration, AssetRecord, PowerDataPoint, PowerHistory, TelemetryRecord};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<Mutex<HashMap<String, u32>>>,
    configs: Arc<Mutex<HashMap<String, AssetConfiguration>>>,
}

impl MockState {
    async fn hit(&self, route: &str) {
        *self.hits.lock().await.entry(route.to_string()).or_default() += 1;
    }
}

/// A running mock API server.
pub struct MockApi {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockApi {
    /// Start the server on an available port.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/api/assets", get(list_assets))
            .route("/api/assets/{id}", get(get_asset))
            .route("/api/telemetry/{id}", get(get_telemetry))
            .route("/api/power/{id}", get(get_power))
            .route("/api/configuration/{id}", get(get_configuration))
            .route("/api/configurations", get(list_configurations))
            .route("/api/configuration", post(save_configuration))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL of the API.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests served for a route label.
    pub async fn hits(&self, route: &str) -> u32 {
        self.state.hits.lock().await.get(route).copied().unwrap_or(0)
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

pub fn catalog() -> Vec<AssetRecord> {
    vec![
        asset("AST-002", "Zeta Compressor", "compressor", "standby"),
        asset("AST-001", "Primary Cooling Pump", "pump", "operational"),
        asset("AST-010", "Asset 10", "turbine", "maintenance"),
    ]
}

fn asset(id: &str, name: &str, asset_type: &str, status: &str) -> AssetRecord {
    AssetRecord {
        id: id.to_string(),
        name: name.to_string(),
        asset_type: asset_type.to_string(),
        location: "Building A".to_string(),
        status: status.to_string(),
        last_updated: "2024-01-15T10:00:00Z".to_string(),
    }
}

pub fn telemetry(asset_id: &str) -> TelemetryRecord {
    TelemetryRecord {
        asset_id: asset_id.to_string(),
        timestamp: "2024-01-15T10:00:00Z".to_string(),
        temperature: 65.0,
        pressure: 120.0,
        vibration: 0.1,
        power_consumption: 42.0,
        status: "normal".to_string(),
    }
}

async fn list_assets(State(state): State<MockState>) -> Json<Vec<AssetRecord>> {
    state.hit("assets").await;
    Json(catalog())
}

async fn get_asset(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.hit("asset").await;
    match catalog().into_iter().find(|a| a.id == id) {
        Some(asset) => Json(asset).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Asset not found"}))).into_response(),
    }
}

async fn get_telemetry(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.hit("telemetry").await;
    if id == "BROKEN" {
        return (StatusCode::OK, "not json").into_response();
    }
    if id == "FAIL" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "internal").into_response();
    }
    Json(telemetry(&id)).into_response()
}

async fn get_power(State(state): State<MockState>, Path(id): Path<String>) -> Json<PowerHistory> {
    state.hit("power").await;
    let point = |ts: &str, kw: f64| PowerDataPoint {
        timestamp: ts.to_string(),
        power_kw: kw,
        efficiency: 88.0,
    };
    Json(PowerHistory {
        asset_id: id.clone(),
        asset_name: format!("Asset {id}"),
        asset_type: "pump".to_string(),
        history: vec![point("2024-01-15T09:00:00Z", 40.0), point("2024-01-15T10:00:00Z", 42.0)],
        forecast: vec![point("2024-01-15T11:00:00Z", 43.0)],
        metadata: BTreeMap::new(),
    })
}

async fn get_configuration(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.hit("configuration").await;
    match state.configs.lock().await.get(&id) {
        Some(config) => Json(config.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Configuration not found"})),
        )
            .into_response(),
    }
}

async fn list_configurations(State(state): State<MockState>) -> Response {
    state.hit("configurations").await;
    let configs: Vec<AssetConfiguration> = state.configs.lock().await.values().cloned().collect();
    Json(json!({"count": configs.len(), "configurations": configs})).into_response()
}

async fn save_configuration(
    State(state): State<MockState>,
    Json(config): Json<AssetConfiguration>,
) -> Response {
    state.hit("save").await;
    if config.alert_email.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [
                {"msg": "Field required", "loc": ["body", "name"]},
                {"msg": "Invalid email", "loc": ["body", "alert_email"]}
            ]})),
        )
            .into_response();
    }
    if !config.alert_email.contains('@') {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid email"}))).into_response();
    }
    if config.name == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "internal").into_response();
    }
    state
        .configs
        .lock()
        .await
        .insert(config.asset_id.clone(), config.clone());
    Json(config).into_response()
}
