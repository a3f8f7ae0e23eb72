// src/config.rs

use serde::Deserialize;

fn default_timeout_secs() -> u64 {
    15
}

// Environment-driven configuration for the backend API client. Read from
// WORKTIME_BASE_URL, WORKTIME_API_TOKEN and WORKTIME_TIMEOUT_SECS.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        envy::prefixed("WORKTIME_").from_env::<ApiConfig>()
    }
}
