use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{GraphQLRequest, GraphQLResponse, OperationKind};
use crate::{
    config::{DEFAULT_ENDPOINT, GatewayConfig},
    error::{GatewayError, GatewayResult},
    i18n::Lang,
};

/// Per-call overrides. Unset fields use the client configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub retries: Option<u32>,
    pub cancel: Option<CancellationToken>,
    pub language: Option<Lang>,
}

impl RequestOptions {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn language(mut self, lang: Lang) -> Self {
        self.language = Some(lang);
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionReport {
    pub success: bool,
    pub error: Option<String>,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Sends every outbound GraphQL call. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GraphQLClient {
    http: Client,
    config: Arc<GatewayConfig>,
    extra_headers: HeaderMap,
}

impl GraphQLClient {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| GatewayError::Validation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config: Arc::new(config),
            extra_headers: HeaderMap::new(),
        })
    }

    /// Adds fixed headers to every request, e.g. from a saved API profile.
    pub fn with_headers<'a, I>(mut self, headers: I) -> GatewayResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in headers {
            let name = HeaderName::from_bytes(key.trim().as_bytes())
                .map_err(|_| GatewayError::Validation(format!("invalid header name: {key}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| GatewayError::Validation(format!("invalid value for header {key}")))?;
            self.extra_headers.insert(name, value);
        }
        Ok(self)
    }

    /// Picks query or mutation semantics from the document itself.
    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Map<String, Value>>,
    ) -> GatewayResult<T> {
        let mut request = GraphQLRequest::new(query);
        request.variables = variables;
        self.execute(request, RequestOptions::default()).await
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Map<String, Value>,
        options: RequestOptions,
    ) -> GatewayResult<T> {
        let request = GraphQLRequest::new(query).with_variables(variables);
        self.execute(request, options).await
    }

    /// Mutations are sent exactly once, whatever the retry settings.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        mutation: &str,
        variables: Map<String, Value>,
        options: RequestOptions,
    ) -> GatewayResult<T> {
        let request = GraphQLRequest::new(mutation).with_variables(variables);
        self.execute(request, options.retries(0)).await
    }

    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: GraphQLRequest,
        options: RequestOptions,
    ) -> GatewayResult<T> {
        let data = self.execute_raw(request, options).await?;
        serde_json::from_value(data).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    /// Returns the `data` member of the response untouched.
    pub async fn execute_raw(
        &self,
        request: GraphQLRequest,
        options: RequestOptions,
    ) -> GatewayResult<Value> {
        if request.query.trim().is_empty() {
            return Err(GatewayError::Validation(
                "GraphQL query is required and must be a non-empty string".to_string(),
            ));
        }

        let kind = request.kind();
        let max_retries = match kind {
            OperationKind::Mutation => 0,
            OperationKind::Query => options.retries.unwrap_or(self.config.retry_attempts),
        };
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let cancel = options.cancel.clone().unwrap_or_default();
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let variable_keys: Vec<&str> = request
            .variables
            .as_ref()
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default();

        tracing::debug!(
            %request_id,
            kind = kind.as_str(),
            variables = ?variable_keys,
            "graphql request"
        );

        // The timeout bounds the whole call, retries and backoff included.
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
            result = tokio::time::timeout(
                timeout,
                self.send_with_retries(&request, &options, max_retries, request_id),
            ) => result.unwrap_or(Err(GatewayError::Timeout(timeout))),
        };

        match &outcome {
            Ok(_) => tracing::info!(
                %request_id,
                kind = kind.as_str(),
                ms = %started.elapsed().as_millis(),
                "graphql request succeeded"
            ),
            Err(err) => tracing::error!(
                %request_id,
                kind = kind.as_str(),
                error_type = err.kind(),
                error = %err,
                ms = %started.elapsed().as_millis(),
                "graphql request failed"
            ),
        }
        outcome
    }

    async fn send_with_retries(
        &self,
        request: &GraphQLRequest,
        options: &RequestOptions,
        max_retries: u32,
        request_id: Uuid,
    ) -> GatewayResult<Value> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.config.retry_delay * 2u32.saturating_pow(attempt - 1);
                tracing::warn!(%request_id, attempt, max_retries, ms = %delay.as_millis(), "retrying graphql request");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(request, options).await {
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    tracing::warn!(%request_id, error = %err, "graphql attempt failed");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn send_once(
        &self,
        request: &GraphQLRequest,
        options: &RequestOptions,
    ) -> GatewayResult<Value> {
        let language = options
            .language
            .map(Lang::code)
            .unwrap_or(self.config.language.as_str());

        let mut builder = self
            .http
            .post(&self.config.endpoint)
            .headers(self.extra_headers.clone())
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, language)
            .json(request);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            builder = builder.header(self.config.api_key_header.as_str(), key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth {
                    status: status.as_u16(),
                    message: body,
                },
                _ => GatewayError::Http {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let body: GraphQLResponse = response.json().await?;
        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let message = errors
                .first()
                .map(|e| e.message.clone())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(GatewayError::GraphQl { message, errors });
        }

        Ok(body.data.unwrap_or(Value::Null))
    }

    pub async fn test_connection(&self) -> ConnectionReport {
        let started = Instant::now();
        let result = self
            .execute_raw(
                GraphQLRequest::new("{ __typename }"),
                RequestOptions::default().retries(0),
            )
            .await;
        let latency_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(_) => ConnectionReport {
                success: true,
                error: None,
                latency_ms,
            },
            Err(err) => ConnectionReport {
                success: false,
                error: Some(err.to_string()),
                latency_ms,
            },
        }
    }

    pub fn validate_configuration(&self) -> ConfigReport {
        let mut issues = Vec::new();
        let mut recommendations = Vec::new();

        if self.config.endpoint.trim().is_empty() {
            issues.push("GRAPHQL_ENDPOINT is not configured".to_string());
            recommendations.push("Set GRAPHQL_ENDPOINT in your environment variables".to_string());
        } else if self.config.endpoint == DEFAULT_ENDPOINT {
            recommendations
                .push("Using default endpoint. Ensure this is correct for your environment.".to_string());
        }

        match self.config.api_key.as_deref() {
            None | Some("") => {
                issues.push("API_KEY is not configured".to_string());
                recommendations.push("Set API_KEY in your environment variables".to_string());
            }
            Some(key) if key.len() < 20 => {
                issues.push("API_KEY appears to be too short - it may be invalid".to_string());
                recommendations.push("Verify your API_KEY is correct and properly generated".to_string());
            }
            Some(_) => {}
        }

        if self.config.timeout < Duration::from_secs(5) {
            recommendations.push(
                "Request timeout is quite short. Consider increasing if you experience timeout errors."
                    .to_string(),
            );
        }

        ConfigReport {
            valid: issues.is_empty(),
            issues,
            recommendations,
        }
    }
}
