use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct DraftConfig {
    /// Inactivity window before an autosave fires.
    pub debounce: Duration,
    /// How long a saved/error status stays visible.
    pub status_clear: Duration,
    /// Drafts are only written once this field is filled in.
    pub required_field: String,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1500),
            status_clear: Duration::from_secs(3),
            required_field: "phone".to_string(),
        }
    }
}

impl DraftConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let millis = |name: &str| {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
        };
        Self {
            debounce: millis("DRAFT_DEBOUNCE_MS").unwrap_or(defaults.debounce),
            status_clear: millis("DRAFT_STATUS_CLEAR_MS").unwrap_or(defaults.status_clear),
            required_field: env::var("DRAFT_REQUIRED_FIELD")
                .ok()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.required_field),
        }
    }
}
