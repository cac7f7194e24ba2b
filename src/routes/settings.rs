use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::settings::{ApiProfile, SaveApiProfileRequest},
    error::{AppError, AppResult},
    graphql::{ConfigReport, ConnectionReport},
    response::{ApiResponse, Meta},
    services::settings_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api-config",
            get(get_api_config).put(save_api_config).delete(clear_api_config),
        )
        .route("/api-config/test", post(test_api_config))
        .route("/gateway", get(gateway_report))
}

#[utoipa::path(
    get,
    path = "/api/settings/api-config",
    responses(
        (status = 200, description = "Saved profile", body = ApiResponse<ApiProfile>),
        (status = 404, description = "Nothing saved yet"),
    ),
    tag = "Settings"
)]
pub async fn get_api_config(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ApiProfile>>> {
    let profile = state.api_config.load().await?.ok_or(AppError::NotFound)?;
    Ok(Json(ApiResponse::success("API config", profile, None)))
}

#[utoipa::path(
    put,
    path = "/api/settings/api-config",
    request_body = SaveApiProfileRequest,
    responses(
        (status = 200, description = "Saved", body = ApiResponse<ApiProfile>),
        (status = 400, description = "Invalid endpoint or header"),
    ),
    tag = "Settings"
)]
pub async fn save_api_config(
    State(state): State<AppState>,
    Json(payload): Json<SaveApiProfileRequest>,
) -> AppResult<Json<ApiResponse<ApiProfile>>> {
    let profile = state.api_config.save(payload).await?;
    Ok(Json(ApiResponse::success(
        "API config saved",
        profile,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/settings/api-config",
    responses(
        (status = 200, description = "Cleared; `data` tells whether anything was removed", body = ApiResponse<bool>),
    ),
    tag = "Settings"
)]
pub async fn clear_api_config(State(state): State<AppState>) -> AppResult<Json<ApiResponse<bool>>> {
    let removed = state.api_config.clear().await?;
    Ok(Json(ApiResponse::success(
        "API config cleared",
        removed,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/settings/api-config/test",
    responses(
        (status = 200, description = "Connection test result", body = ApiResponse<ConnectionReport>),
        (status = 404, description = "Nothing saved yet"),
    ),
    tag = "Settings"
)]
pub async fn test_api_config(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ConnectionReport>>> {
    let profile = state.api_config.load().await?.ok_or(AppError::NotFound)?;
    let report = settings_service::test_profile(&profile, &state.config.gateway).await?;
    Ok(Json(ApiResponse::success("Connection test", report, None)))
}

#[utoipa::path(
    get,
    path = "/api/settings/gateway",
    responses(
        (status = 200, description = "Issues and recommendations for the server gateway", body = ApiResponse<ConfigReport>),
    ),
    tag = "Settings"
)]
pub async fn gateway_report(State(state): State<AppState>) -> Json<ApiResponse<ConfigReport>> {
    Json(ApiResponse::success(
        "Gateway configuration",
        state.gateway.validate_configuration(),
        None,
    ))
}
