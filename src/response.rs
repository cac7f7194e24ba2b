use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    /// Rows returned by the upstream query.
    pub total: Option<usize>,
    /// Rows left after the active/search filters.
    pub shown: Option<usize>,
}

impl Meta {
    pub fn listing(total: usize, shown: usize) -> Self {
        Self {
            total: Some(total),
            shown: Some(shown),
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            shown: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
