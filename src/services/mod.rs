pub mod entity_service;
pub mod listing;
pub mod proxy_service;
pub mod settings_service;
