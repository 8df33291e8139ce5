mod auth;
mod config;
mod errors;
mod market;
mod ratelimit;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{TokenService, UserRecord, UserStore};
use crate::config::Config;
use crate::market::SearchClient;
use crate::ratelimit::RateLimiter;
use crate::report::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

/// Fixed rate-limit policy: 5 requests per minute per client address.
const RATE_LIMIT_MAX_REQUESTS: usize = 5;
const RATE_LIMIT_WINDOW_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Trade Opportunities API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Build the fixed credential table
    let users = build_user_store(&config)?;
    info!("Credential store initialized");

    // Token service over the shared signing secret
    let tokens = TokenService::new(&config.jwt_secret);

    // Outbound clients
    let market = SearchClient::new(config.search_api_key.clone(), config.search_max_results);
    info!(
        "Search client initialized (top {} results)",
        config.search_max_results
    );

    let generator = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", report::MODEL);

    let state = AppState {
        users: Arc::new(users),
        tokens,
        market: Arc::new(market),
        generator: Arc::new(generator),
        limiter: Arc::new(RateLimiter::new(
            RATE_LIMIT_MAX_REQUESTS,
            Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
        )),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    // ConnectInfo gives the rate limiter its per-client key
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Seeds the credential table with the configured demo user. When no hash is
/// configured, one is computed from the demo default password.
fn build_user_store(config: &Config) -> Result<UserStore> {
    let password_hash = match &config.api_password_hash {
        Some(hash) => hash.clone(),
        None => {
            warn!("API_PASSWORD_HASH not set; using the demo default password");
            bcrypt::hash("password123", bcrypt::DEFAULT_COST)?
        }
    };

    Ok(UserStore::new(vec![UserRecord {
        username: config.api_username.clone(),
        password_hash,
    }]))
}
