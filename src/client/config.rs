use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        let timeout = env::var("STOREFRONT_API_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(10);
        Self {
            base_url,
            timeout: Duration::from_secs(timeout),
        }
    }
}
