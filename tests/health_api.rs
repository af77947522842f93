use serde_json::json;
use status_dashboard::transport::{averages_or_empty, history_or_empty, status_or_unknown};
use status_dashboard::{DashboardError, HealthApi, HttpHealthApi, OnlineStatus, Period};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base_url: &str, timeout: Duration) -> HttpHealthApi {
    HttpHealthApi::new(base_url.to_string(), "api".to_string(), timeout).unwrap()
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_online_true_and_null() {
    let server = MockServer::start().await;
    mount(&server, "/online", ResponseTemplate::new(200).set_body_json(true)).await;
    let api = client(&server.uri(), Duration::from_secs(5));
    assert_eq!(assert_ok!(api.fetch_online().await), Some(true));

    let server = MockServer::start().await;
    mount(&server, "/online", ResponseTemplate::new(200).set_body_json(json!(null))).await;
    let api = client(&server.uri(), Duration::from_secs(5));
    assert_eq!(status_or_unknown(&api).await, OnlineStatus::Unknown);
}

#[tokio::test]
async fn test_non_200_is_bad_status() {
    let server = MockServer::start().await;
    mount(&server, "/online", ResponseTemplate::new(503)).await;
    let api = client(&server.uri(), Duration::from_secs(5));

    let err = assert_err!(api.fetch_online().await);
    assert!(matches!(err, DashboardError::BadStatus { status: 503, .. }));
    assert_eq!(status_or_unknown(&api).await, OnlineStatus::Unknown);

    let metrics = api.metrics().unwrap();
    assert_eq!(metrics.attempts, 2);
    assert_eq!(metrics.failures, 2);
}

#[tokio::test]
async fn test_other_success_codes_are_not_accepted() {
    let server = MockServer::start().await;
    mount(&server, "/averages", ResponseTemplate::new(204)).await;
    let api = client(&server.uri(), Duration::from_secs(5));

    assert!(averages_or_empty(&api).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_degrades() {
    let api = client("http://127.0.0.1:9", Duration::from_secs(2));

    let err = assert_err!(api.fetch_online().await);
    assert!(err.is_transport_failure());
    assert_eq!(status_or_unknown(&api).await, OnlineStatus::Unknown);
    assert!(averages_or_empty(&api).await.is_empty());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/averages",
        ResponseTemplate::new(200)
            .set_body_json(json!({"24hours": 1.0}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    let api = client(&server.uri(), Duration::from_secs(1));

    let err = assert_err!(api.fetch_averages().await);
    assert!(matches!(err, DashboardError::Timeout(_)));
}

#[tokio::test]
async fn test_malformed_body_degrades() {
    let server = MockServer::start().await;
    mount(&server, "/online", ResponseTemplate::new(200).set_body_string("<html>")).await;
    let api = client(&server.uri(), Duration::from_secs(5));

    let err = assert_err!(api.fetch_online().await);
    assert!(matches!(err, DashboardError::Json(_)));
}

#[tokio::test]
async fn test_averages_body_is_parsed() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/averages",
        ResponseTemplate::new(200).set_body_json(json!({
            "24hours": 0.999,
            "7days": 0.995,
            "30days": 0.98
        })),
    )
    .await;
    let api = client(&server.uri(), Duration::from_secs(5));

    let averages = assert_ok!(api.fetch_averages().await);
    assert!(averages.is_complete());
    assert_eq!(averages.get(Period::Week), Some(0.995));
}

#[tokio::test]
async fn test_history_uses_service_query_and_tail() {
    let server = MockServer::start().await;
    let days: Vec<_> = (1..=31)
        .map(|d| json!({"date": format!("2024-01-{:02}T00:00:00.000Z", d), "uptime": 0.99}))
        .chain((1..=9).map(|d| json!({"date": format!("2024-02-{:02}", d), "uptime": null})))
        .collect();

    Mock::given(method("GET"))
        .and(path("/history"))
        .and(query_param("service", "api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(days))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server.uri(), Duration::from_secs(5));
    let today = chrono::NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
    let window = history_or_empty(&api, today).await;

    assert_eq!(window.len(), 30);
    assert_eq!(window.first().unwrap().date.to_string(), "2024-01-11");
    assert_eq!(window.entries().last().unwrap().date.to_string(), "2024-02-09");
}

#[tokio::test]
async fn test_history_with_bad_dates_is_empty() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/history",
        ResponseTemplate::new(200).set_body_json(json!([{"date": "last tuesday", "uptime": 1.0}])),
    )
    .await;
    let api = client(&server.uri(), Duration::from_secs(5));
    let today = chrono::NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();

    assert!(history_or_empty(&api, today).await.is_empty());
}
