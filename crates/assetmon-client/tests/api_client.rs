//! Pull API client integration tests against a mock server.

mod common;
use common::mock_api::{catalog, telemetry, MockApi};

use assetmon_client::{ApiClient, CachedApi, ClientError, QueryCache, QueryKey};
use assetmon_core::AssetConfiguration;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

fn valid_config(asset_id: &str) -> AssetConfiguration {
    AssetConfiguration {
        name: "Cooling loop".to_string(),
        alert_email: "ops@example.com".to_string(),
        ..AssetConfiguration::template_for(asset_id, "Building A")
    }
}

#[tokio::test]
async fn test_fetch_assets_and_asset() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    assert_eq!(assert_ok!(client.fetch_assets().await), catalog());
    let asset = assert_ok!(client.fetch_asset("AST-001").await);
    assert_eq!(asset.name, "Primary Cooling Pump");

    let err = assert_err!(client.fetch_asset("NOPE").await);
    assert!(err.is_not_found(), "unexpected error: {err}");

    api.shutdown();
}

#[tokio::test]
async fn test_fetch_telemetry_and_power() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    assert_eq!(client.fetch_telemetry("AST-001").await.unwrap(), telemetry("AST-001"));

    let power = client.fetch_power("AST-001").await.unwrap();
    assert_eq!(power.history.len(), 2);
    assert_eq!(power.chart_series().len(), 3);

    api.shutdown();
}

/// Transport-level problems surface as distinct, non-fatal errors.
#[tokio::test]
async fn test_error_taxonomy() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    assert!(matches!(
        client.fetch_telemetry("BROKEN").await,
        Err(ClientError::Decode(_))
    ));
    assert!(matches!(
        client.fetch_telemetry("FAIL").await,
        Err(ClientError::Status { status: 500, .. })
    ));

    let unreachable = ApiClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    assert!(matches!(
        unreachable.fetch_assets().await,
        Err(ClientError::Transport(_))
    ));

    api.shutdown();
}

/// A missing configuration is `Ok(None)`, not an error, and is not retried.
#[tokio::test]
async fn test_missing_configuration_is_none() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    assert_eq!(client.fetch_configuration("AST-001").await.unwrap(), None);
    assert_eq!(api.hits("configuration").await, 1);

    api.shutdown();
}

#[tokio::test]
async fn test_save_then_read_configuration() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    let config = valid_config("AST-001");
    let saved = client.save_configuration(&config).await.unwrap();
    assert_eq!(saved, config);

    assert_eq!(client.fetch_configuration("AST-001").await.unwrap(), Some(config));
    let list = client.fetch_all_configurations().await.unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.configurations[0].asset_id, "AST-001");

    api.shutdown();
}

/// Both validation detail shapes flatten to a message list.
#[tokio::test]
async fn test_save_validation_failures() {
    let api = MockApi::start().await;
    let client = ApiClient::new(&api.url()).unwrap();

    let mut config = valid_config("AST-001");
    config.alert_email = String::new();
    let err = assert_err!(client.save_configuration(&config).await);
    assert_eq!(err.messages(), vec!["Field required", "Invalid email"]);

    config.alert_email = "not-an-email".to_string();
    let err = client.save_configuration(&config).await.unwrap_err();
    assert!(matches!(&err, ClientError::Validation(_)));
    assert_eq!(err.messages(), vec!["Invalid email"]);

    config.alert_email = "ops@example.com".to_string();
    config.name = "boom".to_string();
    let err = client.save_configuration(&config).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    assert_eq!(err.messages(), vec!["An unexpected error occurred."]);

    api.shutdown();
}

#[tokio::test]
async fn test_cached_reads_share_results() {
    let api = MockApi::start().await;
    let cache = Arc::new(QueryCache::new());
    let cached = CachedApi::with_cache(
        ApiClient::new(&api.url()).unwrap(),
        cache.clone(),
        Duration::from_secs(60),
    );

    let first = cached.assets().await.unwrap();
    let second = cached.assets().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(api.hits("assets").await, 1);

    let refreshed = cached.refresh_assets().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert_eq!(api.hits("assets").await, 2);

    cached.power("AST-001").await.unwrap();
    cached.power("AST-001").await.unwrap();
    assert_eq!(api.hits("power").await, 1);

    api.shutdown();
}

/// Saving a configuration invalidates the cached configuration for that id.
#[tokio::test]
async fn test_save_invalidates_configuration() {
    let api = MockApi::start().await;
    let cache = Arc::new(QueryCache::new());
    let cached = CachedApi::with_cache(
        ApiClient::new(&api.url()).unwrap(),
        cache.clone(),
        Duration::from_secs(60),
    );

    assert!(cached.configuration("AST-001").await.unwrap().is_none());
    assert!(cached.configuration("AST-001").await.unwrap().is_none());
    assert_eq!(api.hits("configuration").await, 1);

    cached.configurations().await.unwrap();
    let config = valid_config("AST-001");
    cached.save_configuration(&config).await.unwrap();
    assert!(cache.age(&QueryKey::Configuration("AST-001".to_string())).is_none());
    assert!(cache.age(&QueryKey::Configurations).is_none());

    let after = cached.configuration("AST-001").await.unwrap();
    assert_eq!(after.as_ref().as_ref(), Some(&config));
    assert_eq!(api.hits("configuration").await, 2);

    api.shutdown();
}

/// A failed save leaves cached data alone.
#[tokio::test]
async fn test_failed_save_keeps_cache() {
    let api = MockApi::start().await;
    let cache = Arc::new(QueryCache::new());
    let cached = CachedApi::with_cache(
        ApiClient::new(&api.url()).unwrap(),
        cache.clone(),
        Duration::from_secs(60),
    );

    cached.configuration("AST-002").await.unwrap();
    let mut config = valid_config("AST-002");
    config.alert_email = String::new();
    assert!(cached.save_configuration(&config).await.is_err());
    assert!(cache.age(&QueryKey::Configuration("AST-002".to_string())).is_some());

    api.shutdown();
}
