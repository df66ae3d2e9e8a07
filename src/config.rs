use std::time::Duration;

/// Runtime configuration read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Public address of this service, always ending in `/`. Webhook
    /// callback URLs are built from it.
    pub base_uri: String,
    pub hipchat_api_url: String,
    pub http_timeout: Duration,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let http_timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            base_uri: normalize_base_uri(
                std::env::var("BASE_URI").unwrap_or_else(|_| "http://localhost:3000/".to_string()),
            ),
            hipchat_api_url: std::env::var("HIPCHAT_API_URL")
                .unwrap_or_else(|_| "https://api.hipchat.com".to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Configuration for tests: upstream at `hipchat_api_url`, no database.
    pub fn for_upstream(hipchat_api_url: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            base_uri: "http://localhost:3000/".to_string(),
            hipchat_api_url: hipchat_api_url.into(),
            http_timeout: Duration::from_secs(5),
            database_url: None,
        }
    }
}

fn normalize_base_uri(mut base_uri: String) -> String {
    if !base_uri.ends_with('/') {
        base_uri.push('/');
    }
    base_uri
}
