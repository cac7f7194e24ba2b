use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::GatewayConfig,
    dto::settings::{ApiProfile, SaveApiProfileRequest},
    error::{AppError, AppResult},
    graphql::{ConnectionReport, GraphQLClient},
};

/// JSON file holding the API testing profile.
#[derive(Debug)]
pub struct ApiConfigStore {
    path: PathBuf,
    // Serializes writers so two saves cannot interleave.
    lock: Mutex<()>,
}

impl ApiConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> AppResult<Option<ApiProfile>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::Internal(err.into())),
        };
        match serde_json::from_slice(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable api config");
                Ok(None)
            }
        }
    }

    pub async fn save(&self, request: SaveApiProfileRequest) -> AppResult<ApiProfile> {
        validate_profile(&request)?;
        let profile = ApiProfile {
            endpoint: request.endpoint.trim().to_string(),
            headers: request.headers,
            saved_at: Some(Utc::now()),
        };

        let _guard = self.lock.lock().await;
        let body = serde_json::to_vec_pretty(&profile).map_err(|e| AppError::Internal(e.into()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        tracing::info!(path = %self.path.display(), "api config saved");
        Ok(profile)
    }

    pub async fn clear(&self) -> AppResult<bool> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(AppError::Internal(err.into())),
        }
    }
}

pub fn validate_profile(request: &SaveApiProfileRequest) -> AppResult<()> {
    let endpoint = request.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(AppError::Validation(
            "Endpoint must be an http or https URL".to_string(),
        ));
    }
    if request.headers.iter().any(|h| h.key.trim().is_empty()) {
        return Err(AppError::Validation("Header names cannot be empty".to_string()));
    }
    Ok(())
}

/// Runs a `{ __typename }` request against the saved endpoint, sending only
/// the enabled headers.
pub async fn test_profile(profile: &ApiProfile, base: &GatewayConfig) -> AppResult<ConnectionReport> {
    let mut config = GatewayConfig::new(profile.endpoint.clone()).with_timeout(base.timeout);
    config.language = base.language.clone();
    let client = GraphQLClient::new(config)?.with_headers(
        profile
            .headers
            .iter()
            .filter(|h| h.enabled)
            .map(|h| (h.key.as_str(), h.value.as_str())),
    )?;
    Ok(client.test_connection().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::settings::HeaderEntry;

    fn request(endpoint: &str) -> SaveApiProfileRequest {
        SaveApiProfileRequest {
            endpoint: endpoint.to_string(),
            headers: vec![HeaderEntry {
                key: "X-API-KEY".into(),
                value: "secret".into(),
                enabled: true,
            }],
        }
    }

    #[tokio::test]
    async fn save_load_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApiConfigStore::new(dir.path().join("nested/api-config.json"));

        assert!(store.load().await.unwrap().is_none());

        let saved = store.save(request(" https://odoo.test/graphql ")).await.unwrap();
        assert_eq!(saved.endpoint, "https://odoo.test/graphql");
        assert!(saved.saved_at.is_some());

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, saved);

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
    }

    #[tokio::test]
    async fn invalid_profiles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ApiConfigStore::new(dir.path().join("api-config.json"));
        assert!(matches!(
            store.save(request("ftp://odoo")).await,
            Err(AppError::Validation(_))
        ));

        let mut blank_header = request("https://odoo.test");
        blank_header.headers[0].key = " ".into();
        assert!(store.save(blank_header).await.is_err());
    }

    #[tokio::test]
    async fn corrupt_file_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api-config.json");
        tokio::fs::write(&path, b"{oops").await.unwrap();
        assert!(ApiConfigStore::new(path).load().await.unwrap().is_none());
    }
}
