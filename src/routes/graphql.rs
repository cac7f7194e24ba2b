use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{
        HeaderValue, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::post,
};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    config::AppConfig, error::AppResult, graphql::GraphQLRequest, services::proxy_service,
    state::AppState,
};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub fn router(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", post(proxy_graphql).options(preflight))
        .layer(cors_layer(config))
}

/// Development accepts any origin; production only the configured list.
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = if config.is_production() {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter(|origin| origin.as_str() != "*")
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        AllowOrigin::list(allowed)
    } else {
        AllowOrigin::from(Any)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(PREFLIGHT_MAX_AGE)
}

#[utoipa::path(
    post,
    path = "/api/graphql",
    request_body = GraphQLRequest,
    responses(
        (status = 200, description = "Upstream `data`, wrapped as `{data}`"),
        (status = 400, description = "Missing query or malformed JSON"),
        (status = 403, description = "Introspection query rejected"),
        (status = 408, description = "Upstream timeout"),
        (status = 503, description = "Upstream unreachable"),
        (status = 500, description = "GraphQL or upstream error"),
    ),
    tag = "GraphQL"
)]
pub async fn proxy_graphql(State(state): State<AppState>, body: Bytes) -> AppResult<Json<Value>> {
    let data = proxy_service::forward(&state.gateway, &body).await?;
    Ok(Json(json!({ "data": data })))
}

/// Bare OPTIONS without CORS request headers; real preflights are answered
/// by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
