use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::remote::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::storage::{KeyValueStore, CONFIG_KEY};

pub const API_URL_ENV: &str = "TASKDECK_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct AppConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Reads the `config` entry; a missing or broken entry yields the defaults.
    pub fn load(storage: &impl KeyValueStore) -> Self {
        match storage.get::<AppConfig>(CONFIG_KEY) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(error) => {
                log::warn!("config unreadable, using defaults: {error}");
                Self::default()
            }
        }
    }

    /// Applies `TASKDECK_API_URL` when it is set and non-blank.
    pub fn with_env(self) -> Self {
        let url = std::env::var(API_URL_ENV).ok();
        self.with_api_url(url)
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|value| !value.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
