use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The base URL of the backend API.
    pub backend_url: String,
    /// The timeout applied to every outgoing HTTP request.
    pub http_timeout: Duration,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("BACKEND_URL")
            .context("BACKEND_URL must be set (e.g. http://localhost:8000/api)")?;

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Invalid HTTP_TIMEOUT_SECS")?;

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// Creates a `Config` pointing at the given base URL, with defaults for
    /// everything else.
    pub fn with_backend_url(backend_url: &str) -> Self {
        Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}
