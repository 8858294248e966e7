//! Configuration types.

use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the LearnFrame API, including the `/api` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gdghack-co9h.onrender.com/api".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Reads `LEARNFRAME_API_URL`. A trailing slash is stripped so path
    /// joining stays uniform.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("LEARNFRAME_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        config
    }
}
