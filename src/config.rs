use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_ENDPOINT: &str = "https://portal.alromaihcars.com/graphql";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Settings for talking to the upstream GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub language: String,
}

impl GatewayConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            api_key_header: "X-API-KEY".to_string(),
            timeout: Duration::from_millis(30_000),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(1_000),
            language: "ar_001".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub allowed_origins: Vec<String>,
    pub api_config_path: PathBuf,
    pub gateway: GatewayConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("API_KEY")
            .map_err(|_| anyhow::anyhow!("API_KEY environment variable is required but not set"))?;
        let endpoint =
            env::var("GRAPHQL_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let environment = Environment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let api_config_path = env::var("API_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("api-config.json"));

        let mut gateway = GatewayConfig::new(endpoint)
            .with_api_key(api_key)
            .with_timeout(Duration::from_millis(env_or("REQUEST_TIMEOUT_MS", 30_000)))
            .with_retries(
                env_or::<u32>("RETRY_ATTEMPTS", 2),
                Duration::from_millis(env_or("RETRY_DELAY_MS", 1_000)),
            );
        if let Ok(header) = env::var("API_KEY_HEADER") {
            gateway.api_key_header = header;
        }
        if let Ok(language) = env::var("DEFAULT_LANGUAGE") {
            gateway.language = language;
        }

        Ok(Self {
            host,
            port,
            environment,
            allowed_origins,
            api_config_path,
            gateway,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(env::var(key).ok().as_deref(), default)
}

/// Values that do not parse into `T`, including out-of-range numbers, fall
/// back to the default.
fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
