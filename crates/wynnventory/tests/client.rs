//! Integration tests for the wynnventory client against a mock upstream.

use assert_matches::assert_matches;
use wynnpool_core::error::CoreError;
use wynnpool_core::pool::{PoolFetcher, PoolKind};
use wynnpool_core::window::{DayWindow, PoolWindow, WeekWindow};
use wynnpool_wynnventory::{WynnventoryApi, WynnventoryConfig};

fn client_for(server: &mockito::Server, api_key: Option<&str>) -> WynnventoryApi {
    let config = WynnventoryConfig {
        base_url: server.url(),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
    };
    WynnventoryApi::new(&config).expect("client should build")
}

// ---------------------------------------------------------------------------
// Current rotations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn current_lootpool_sends_api_key_and_returns_regions() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/lootpool/current")
        .match_header("authorization", "Api-Key test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "regions": [
                    {"region": "SE"}, {"region": "SI"}, {"region": "MH"},
                    {"region": "CORK"}, {"region": "SKY"}
                ],
                "year": 2024,
                "week": 38
            }"#,
        )
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let fetched = api.fetch_current(PoolKind::Lootrun).await.unwrap();

    mock.assert_async().await;
    assert_eq!(fetched.entries.len(), 5);
    assert_eq!(fetched.entries[0]["region"], "SE");
    assert_eq!(fetched.reported.year, Some(2024));
    assert_eq!(fetched.reported.week, Some(38));
}

#[tokio::test]
async fn null_regions_read_as_empty_entries() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/raidpool/current")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"regions": null, "year": 2024, "week": 38}"#)
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let fetched = api.fetch_current(PoolKind::Raidpool).await.unwrap();

    mock.assert_async().await;
    assert!(fetched.entries.is_empty());
}

#[tokio::test]
async fn gambits_are_read_from_gambits_field() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/raidpool/gambits/current")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "gambits": [{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}],
                "year": 2024,
                "month": 9,
                "day": 20
            }"#,
        )
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let fetched = api.fetch_current(PoolKind::Gambits).await.unwrap();

    mock.assert_async().await;
    assert_eq!(fetched.entries.len(), 4);
    assert_eq!(fetched.reported.month, Some(9));
    assert_eq!(fetched.reported.day, Some(20));
}

// ---------------------------------------------------------------------------
// Historical rotations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn historical_raidpool_uses_year_and_week_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/raidpool/2023/12")
        .match_header("authorization", "Api-Key test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"regions": [{}, {}, {}, {}], "year": 2023, "week": 12}"#)
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let window = PoolWindow::Week(WeekWindow::new(2023, 12));
    let fetched = api
        .fetch_window(PoolKind::Raidpool, &window)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fetched.entries.len(), 4);
}

#[tokio::test]
async fn historical_gambits_are_rejected_without_a_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let window = PoolWindow::Day(DayWindow::new(2024, 9, 20));
    let err = api
        .fetch_window(PoolKind::Gambits, &window)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert_matches!(err, CoreError::Validation(_));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_upstream_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/lootpool/current")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let err = api.fetch_current(PoolKind::Lootrun).await.unwrap_err();

    mock.assert_async().await;
    assert_matches!(err, CoreError::UpstreamUnavailable(msg) if msg.contains("503"));
}

#[tokio::test]
async fn malformed_body_is_upstream_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/lootpool/current")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let api = client_for(&server, Some("test-key"));
    let err = api.fetch_current(PoolKind::Lootrun).await.unwrap_err();

    assert_matches!(err, CoreError::UpstreamUnavailable(_));
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let api = client_for(&server, None);
    assert_matches!(api.ensure_configured(), Err(CoreError::Configuration(_)));

    let err = api.fetch_current(PoolKind::Lootrun).await.unwrap_err();

    mock.assert_async().await;
    assert_matches!(err, CoreError::Configuration(_));
}

#[tokio::test]
async fn configured_client_passes_configuration_check() {
    let server = mockito::Server::new_async().await;
    let api = client_for(&server, Some("test-key"));
    assert!(api.ensure_configured().is_ok());
}
