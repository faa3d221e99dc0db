use std::{env, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub concurrency_limit: usize,
    pub body_limit_bytes: usize,
    /// Drafts untouched for longer than this are purged.
    pub draft_retention: Duration,
    pub draft_purge_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let retention_days: u64 = parse_or("DRAFT_RETENTION_DAYS", 14);
        let purge_minutes: u64 = parse_or("DRAFT_PURGE_INTERVAL_MINUTES", 60);

        Ok(Self {
            port,
            database_url,
            host,
            concurrency_limit: parse_or("APP_CONCURRENCY_LIMIT", 100),
            body_limit_bytes: parse_or("APP_BODY_LIMIT_BYTES", 1024 * 1024),
            draft_retention: Duration::from_secs(retention_days * 24 * 60 * 60),
            draft_purge_interval: Duration::from_secs(purge_minutes.max(1) * 60),
        })
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
