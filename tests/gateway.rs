mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

use car_dashboard_api::{
    config::GatewayConfig,
    error::GatewayError,
    graphql::{GraphQLClient, GraphQLRequest, RequestOptions, documents},
    i18n::Lang,
};
use common::{MockUpstream, TEST_API_KEY, closed_endpoint, gateway_config};

fn client(endpoint: &str) -> GraphQLClient {
    GraphQLClient::new(gateway_config(endpoint)).unwrap()
}

#[tokio::test]
async fn graphql_errors_surface_first_message() {
    let upstream = MockUpstream::start(|_, _| {
        (
            StatusCode::OK,
            json!({"errors": [{"message": "Brand not found"}, {"message": "second"}]}),
        )
    })
    .await;

    let err = client(&upstream.endpoint)
        .query::<Value>(documents::GET_CAR_BRANDS, Map::new(), RequestOptions::default())
        .await
        .unwrap_err();

    match err {
        GatewayError::GraphQl { message, errors } => {
            assert_eq!(message, "Brand not found");
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected a GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn sends_key_accept_and_language_headers() {
    let upstream = MockUpstream::start(|_, _| (StatusCode::OK, json!({"data": {"CarYear": []}}))).await;
    let gateway = client(&upstream.endpoint);

    gateway
        .query::<Value>(documents::GET_CAR_YEARS, Map::new(), RequestOptions::default())
        .await
        .unwrap();
    gateway
        .query::<Value>(
            documents::GET_CAR_YEARS,
            Map::new(),
            RequestOptions::default().language(Lang::EnUs),
        )
        .await
        .unwrap();

    let calls = upstream.calls();
    let first = &calls[0].headers;
    assert_eq!(first["x-api-key"], TEST_API_KEY);
    assert_eq!(first["accept"], "application/json");
    assert_eq!(first["accept-language"], "ar_001");
    assert!(first["content-type"].to_str().unwrap().starts_with("application/json"));
    assert_eq!(calls[1].headers["accept-language"], "en_US");
    assert_eq!(calls[0].body["query"], documents::GET_CAR_YEARS);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let upstream = MockUpstream::start_with_delay(Duration::from_secs(3), |_, _| {
        (StatusCode::OK, json!({"data": {}}))
    })
    .await;
    let gateway = client(&upstream.endpoint);

    let started = Instant::now();
    let err = gateway
        .query::<Value>(
            documents::GET_CAR_BRANDS,
            Map::new(),
            RequestOptions::default().timeout(Duration::from_millis(300)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Timeout(d) if d == Duration::from_millis(300)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn timeout_covers_retries_and_backoff() {
    let upstream = MockUpstream::start_with_delay(Duration::from_secs(3), |_, _| {
        (StatusCode::OK, json!({"data": {}}))
    })
    .await;
    // Default retry settings: two retries with a one second base delay.
    let config = GatewayConfig::new(upstream.endpoint.clone())
        .with_api_key(TEST_API_KEY)
        .with_timeout(Duration::from_millis(1_000));
    let gateway = GraphQLClient::new(config).unwrap();

    let started = Instant::now();
    let err = gateway
        .query::<Value>(documents::GET_CAR_BRANDS, Map::new(), RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Timeout(d) if d == Duration::from_millis(1_000)));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn commented_or_fragment_led_mutations_are_sent_once() {
    for document in [
        "# create a brand\nmutation CreateCarBrand($values: CarBrandValues!) { CarBrand(CarBrandValues: $values) { id } }",
        "fragment F on CarBrand { id } mutation M { CarBrand(CarBrandValues: { active: false }) { ...F } }",
    ] {
        let upstream = MockUpstream::start(|_, _| (StatusCode::BAD_GATEWAY, json!({}))).await;

        let err = client(&upstream.endpoint)
            .execute::<Value>(GraphQLRequest::new(document), RequestOptions::default().retries(2))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Http { status: 502, .. }));
        assert_eq!(upstream.call_count(), 1, "{document}");
    }
}

#[tokio::test]
async fn queries_retry_transient_failures() {
    let upstream = MockUpstream::start(|index, _| {
        if index < 2 {
            (StatusCode::BAD_GATEWAY, json!({"error": "upstream restarting"}))
        } else {
            (StatusCode::OK, json!({"data": {"CarColor": []}}))
        }
    })
    .await;

    let data: Value = client(&upstream.endpoint)
        .query(documents::GET_CAR_COLORS, Map::new(), RequestOptions::default().retries(2))
        .await
        .unwrap();

    assert_eq!(data, json!({"CarColor": []}));
    assert_eq!(upstream.call_count(), 3);
}

#[tokio::test]
async fn mutations_are_sent_once() {
    let upstream = MockUpstream::start(|_, _| (StatusCode::BAD_GATEWAY, json!({}))).await;

    let err = client(&upstream.endpoint)
        .mutate::<Value>(
            documents::DEACTIVATE_CAR_COLOR,
            Map::from_iter([("id".to_string(), json!("4"))]),
            RequestOptions::default().retries(3),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Http { status: 502, .. }));
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let upstream = MockUpstream::start(|_, _| (StatusCode::UNAUTHORIZED, json!({"error": "bad key"}))).await;

    let err = client(&upstream.endpoint)
        .query::<Value>(documents::GET_CAR_TRIMS, Map::new(), RequestOptions::default().retries(2))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Auth { status: 401, .. }));
    assert_eq!(upstream.call_count(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let err = client(&closed_endpoint().await)
        .query::<Value>(documents::GET_CAR_MODELS, Map::new(), RequestOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

#[tokio::test]
async fn cancellation_resolves_immediately() {
    let upstream = MockUpstream::start_with_delay(Duration::from_secs(3), |_, _| {
        (StatusCode::OK, json!({"data": {}}))
    })
    .await;
    let gateway = client(&upstream.endpoint);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = gateway
        .query::<Value>(
            documents::GET_CAR_VARIANTS,
            Map::new(),
            RequestOptions::default().cancel_on(token),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn connection_test_reports_success_and_failure() {
    let upstream =
        MockUpstream::start(|_, _| (StatusCode::OK, json!({"data": {"__typename": "Query"}}))).await;
    let ok = client(&upstream.endpoint).test_connection().await;
    assert!(ok.success);
    assert!(ok.error.is_none());
    assert_eq!(upstream.calls()[0].body["query"], "{ __typename }");

    let failed = client(&closed_endpoint().await).test_connection().await;
    assert!(!failed.success);
    assert!(failed.error.unwrap().contains("Network error"));
}
