use std::time::Duration;

use ureq::Agent;

/// Default base URL of the MindSpace REST API.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Join `path` onto the base URL with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Build a blocking HTTP agent with the configured global timeout.
pub fn build_agent(config: &ApiConfig) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(config.timeout))
        .build()
        .into()
}
