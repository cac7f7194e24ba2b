use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    graphql::GraphQLErrorItem,
    response::{ApiResponse, Meta},
};

/// Failures of an outbound GraphQL call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error - unable to connect to GraphQL server: {0}")]
    Network(String),

    #[error("Request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("GraphQL Error: {message}")]
    GraphQl {
        message: String,
        errors: Vec<GraphQLErrorItem>,
    },

    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Transient failures worth another attempt on idempotent queries.
    /// `Timeout` ends the whole call, so it is never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) => true,
            GatewayError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::Network(_) => "NETWORK_ERROR",
            GatewayError::Timeout(_) => "TIMEOUT_ERROR",
            GatewayError::GraphQl { .. } => "GRAPHQL_ERROR",
            GatewayError::Auth { .. } => "AUTHENTICATION_ERROR",
            GatewayError::Http { .. } => "SERVER_ERROR",
            GatewayError::InvalidResponse(_) => "SERVER_ERROR",
            GatewayError::Cancelled => "CANCELLED",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::InvalidResponse(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("ValidationError: {0}")]
    Validation(String),

    #[error("Forbidden {0}")]
    Forbidden(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Network error - unable to connect to GraphQL server")]
    Network,

    #[error("GraphQL request failed: {0}")]
    Gateway(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(msg) => AppError::Validation(msg),
            GatewayError::Timeout(_) => AppError::Timeout,
            GatewayError::Network(_) => AppError::Network,
            other => AppError::Gateway(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Network => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
