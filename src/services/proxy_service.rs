use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    graphql::{GraphQLClient, GraphQLRequest, RequestOptions, is_introspection},
};

/// Parses a browser GraphQL envelope and rejects what must not be forwarded.
pub fn parse_envelope(body: &[u8]) -> AppResult<GraphQLRequest> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest("Invalid JSON in request body".to_string()))?;

    match raw.get("query") {
        None | Some(Value::Null) => {
            return Err(AppError::BadRequest("GraphQL query is required".to_string()));
        }
        Some(Value::String(q)) if q.trim().is_empty() => {
            return Err(AppError::BadRequest("GraphQL query is required".to_string()));
        }
        Some(Value::String(_)) => {}
        Some(_) => return Err(AppError::BadRequest("Invalid query format".to_string())),
    }

    let request: GraphQLRequest = serde_json::from_value(raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid GraphQL envelope: {e}")))?;

    if is_introspection(&request.query) {
        return Err(AppError::Forbidden(
            "Introspection queries are not allowed".to_string(),
        ));
    }

    Ok(request)
}

/// Forwards a browser request with the server-held key and returns `data`.
/// Timeout and query retries come from the gateway configuration.
pub async fn forward(client: &GraphQLClient, body: &[u8]) -> AppResult<Value> {
    let request = parse_envelope(body)?;
    tracing::info!(
        kind = request.kind().as_str(),
        operation = request.operation_name.as_deref().unwrap_or("-"),
        "proxying graphql request"
    );
    let data = client.execute_raw(request, RequestOptions::default()).await?;
    Ok(data)
}
