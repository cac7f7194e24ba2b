use std::sync::Arc;

use crate::{
    config::AppConfig,
    graphql::GraphQLClient,
    models::Entity,
    services::{entity_service::EntityService, settings_service::ApiConfigStore},
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: GraphQLClient,
    pub config: Arc<AppConfig>,
    pub api_config: Arc<ApiConfigStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let gateway = GraphQLClient::new(config.gateway.clone())?;
        let api_config = ApiConfigStore::new(config.api_config_path.clone());
        Ok(Self {
            gateway,
            config: Arc::new(config),
            api_config: Arc::new(api_config),
        })
    }

    pub fn entities<E: Entity>(&self) -> EntityService<E> {
        EntityService::new(self.gateway.clone())
    }
}
