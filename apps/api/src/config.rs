use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub anthropic_api_key: String,
    pub search_api_key: String,
    pub search_max_results: usize,
    pub api_username: String,
    /// Bcrypt hash for the demo user. When unset, a hash of the demo
    /// default password is computed at startup.
    pub api_password_hash: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            jwt_secret: require_env("JWT_SECRET")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            search_api_key: require_env("SEARCH_API_KEY")?,
            search_max_results: std::env::var("SEARCH_MAX_RESULTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<usize>()
                .context("SEARCH_MAX_RESULTS must be a positive integer")?,
            api_username: std::env::var("API_USERNAME")
                .unwrap_or_else(|_| "testuser".to_string()),
            api_password_hash: std::env::var("API_PASSWORD_HASH").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
