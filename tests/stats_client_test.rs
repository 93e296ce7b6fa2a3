//! Stats collector client tests
//!
//! The client is best-effort by contract: hits are fire-and-forget and view
//! counts degrade to zeros on any collector failure. Exercised against a
//! wiremock collector.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use EventHive::config::StatsConfig;
use EventHive::services::StatsService;
use EventHive::utils::datetime;

fn config_for(server: &MockServer) -> StatsConfig {
    StatsConfig {
        base_url: Some(server.uri()),
        app_name: "eventhive-main".to_string(),
        timeout_seconds: 2,
    }
}

#[tokio::test]
async fn test_record_hit_posts_boundary_formatted_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hit"))
        .and(body_partial_json(json!({
            "app": "eventhive-main",
            "uri": "/events/7",
            "ip": "10.0.0.1",
            "timestamp": "2035-06-01 18:30:00"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let service = StatsService::new(&config_for(&server)).unwrap();
    let timestamp = datetime::parse("2035-06-01 18:30:00").unwrap();
    service.record_hit("/events/7", "10.0.0.1", timestamp).await;

    server.verify().await;
}

#[tokio::test]
async fn test_record_hit_swallows_collector_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hit"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = StatsService::new(&config_for(&server)).unwrap();
    // Must not panic or surface the failure
    service
        .record_hit("/events/7", "10.0.0.1", datetime::now())
        .await;
}

#[tokio::test]
async fn test_view_counts_map_collector_response_onto_uris() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .and(query_param("unique", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"app": "eventhive-main", "uri": "/events/1", "hits": 17},
            {"app": "eventhive-main", "uri": "/events/3", "hits": 4}
        ])))
        .mount(&server)
        .await;

    let service = StatsService::new(&config_for(&server)).unwrap();
    let uris = vec![
        "/events/1".to_string(),
        "/events/2".to_string(),
        "/events/3".to_string(),
    ];
    let counts = service
        .view_counts(&uris, datetime::stats_window_start(), datetime::now(), true)
        .await;

    assert_eq!(counts.get("/events/1"), Some(&17));
    // Uris the collector did not report stay at zero
    assert_eq!(counts.get("/events/2"), Some(&0));
    assert_eq!(counts.get("/events/3"), Some(&4));
}

#[tokio::test]
async fn test_view_counts_degrade_to_zeros_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = StatsService::new(&config_for(&server)).unwrap();
    let uris = vec!["/events/1".to_string(), "/events/2".to_string()];
    let counts = service
        .view_counts(&uris, datetime::stats_window_start(), datetime::now(), false)
        .await;

    assert_eq!(counts.len(), 2);
    assert!(counts.values().all(|&hits| hits == 0));
}
