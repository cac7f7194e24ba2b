mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use car_dashboard_api::{
    graphql::{GraphQLClient, RequestOptions},
    models::Brand,
    services::{
        entity_service::{EntityService, ListFilter},
        listing::EntityList,
    },
};
use common::{MockUpstream, body_json, build_test_app, gateway_config, send_json, test_config};

fn brand(id: i64, en: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": {"en_US": en},
        "description": false,
        "slug": false,
        "logo": false,
        "display_name": en,
        "active": active,
        "model_ids": false
    })
}

fn is_mutation(body: &Value) -> bool {
    body["query"].as_str().unwrap_or("").starts_with("mutation")
}

#[tokio::test]
async fn create_sends_only_filled_languages_and_list_picks_it_up() {
    let upstream = MockUpstream::start(|_, body| {
        if is_mutation(body) {
            let values = &body["variables"]["values"];
            assert_eq!(values["name_translations"], json!({"en_US": "Toyota"}));
            assert!(values.get("description_translations").is_none());
            assert_eq!(values["active"], true);
            (StatusCode::OK, json!({"data": {"CarBrand": brand(7, "Toyota", true)}}))
        } else {
            (
                StatusCode::OK,
                json!({"data": {"CarBrand": [brand(9, "Lexus", true), brand(8, "Old", false)]}}),
            )
        }
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&upstream.endpoint, dir.path()));

    let service = EntityService::<Brand>::new(GraphQLClient::new(gateway_config(&upstream.endpoint)).unwrap());
    let mut list = EntityList::<Brand>::new();
    let ticket = list.begin_fetch(false);
    let rows = service
        .fetch_all(
            &ListFilter::default(),
            RequestOptions::default().cancel_on(ticket.token()),
        )
        .await;
    assert!(list.apply(&ticket, rows));
    let before: Vec<i64> = list.rows().iter().map(|b| b.id).collect();
    assert_eq!(before, vec![9]);

    let response = send_json(
        app,
        "POST",
        "/api/brands",
        &json!({"name": {"en_US": "Toyota", "ar_001": ""}, "description": {"en_US": " ", "ar_001": ""}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], 7);
    assert_eq!(body["data"]["name"], json!({"en_US": "Toyota"}));

    let created: Brand = serde_json::from_value(body["data"].clone()).unwrap();
    list.insert_created(created);

    assert_eq!(list.rows().len(), before.len() + 1);
    let added = list.rows().iter().find(|b| b.id == 7).unwrap();
    assert!(added.active);
    assert!(added.logo.is_none());
}

#[tokio::test]
async fn create_without_name_never_reaches_upstream() {
    let upstream = MockUpstream::start(|_, _| (StatusCode::OK, json!({"data": {}}))).await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&upstream.endpoint, dir.path()));

    let response = send_json(
        app,
        "POST",
        "/api/brands",
        &json!({"name": {"en_US": "  ", "ar_001": ""}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn list_endpoint_filters_and_reports_counts() {
    let upstream = MockUpstream::start(|_, _| {
        (
            StatusCode::OK,
            json!({"data": {"CarBrand": [brand(1, "Toyota", true), brand(2, "Lexus", true), brand(3, "Datsun", false)]}}),
        )
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&upstream.endpoint, dir.path());

    let body = body_json(common::get(build_test_app(config.clone()), "/api/brands?sort_order=asc&lang=en").await).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"]["en_US"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Lexus", "Toyota"]);
    assert_eq!(body["meta"], json!({"total": 3, "shown": 2}));

    let body = body_json(
        common::get(build_test_app(config), "/api/brands?include_inactive=true&q=DAT").await,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["active"], false);
}

#[tokio::test]
async fn blocked_deactivation_mentions_related_records() {
    let upstream = MockUpstream::start(|_, _| {
        (
            StatusCode::OK,
            json!({"errors": [{"message": "The operation cannot be completed: another model requires the record"}]}),
        )
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&upstream.endpoint, dir.path()));

    let response = send_json(app, "DELETE", "/api/brands/7", &json!({})).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("may have related records"));

    let call = &upstream.calls()[0].body;
    assert_eq!(call["variables"]["id"], "7");
    assert!(call["query"].as_str().unwrap().contains("active: false"));
}

#[tokio::test]
async fn oversized_logo_is_rejected_locally() {
    use base64::Engine;

    let upstream = MockUpstream::start(|_, _| (StatusCode::OK, json!({"data": {}}))).await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&upstream.endpoint, dir.path()));
    let content = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 6 * 1024 * 1024]);

    let response = send_json(
        app,
        "PUT",
        "/api/brands/7/logo",
        &json!({"file_name": "logo.jpg", "mime_type": "image/jpeg", "content_base64": content}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("exceeds maximum allowed size"));
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn logo_upload_sends_bare_base64() {
    let upstream = MockUpstream::start(|_, body| {
        assert_eq!(body["variables"]["logo"], "iVBORw0KGgo=");
        (StatusCode::OK, json!({"data": {"CarBrand": brand(7, "Toyota", true)}}))
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(test_config(&upstream.endpoint, dir.path()));

    let response = send_json(
        app,
        "PUT",
        "/api/brands/7/logo",
        &json!({
            "file_name": "logo.png",
            "mime_type": "image/png",
            "content_base64": "data:image/png;base64,iVBORw0KGgo="
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(upstream.call_count(), 1);
}
