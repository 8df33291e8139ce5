use std::sync::Arc;

use crate::auth::{TokenService, UserStore};
use crate::market::MarketData;
use crate::ratelimit::RateLimiter;
use crate::report::ReportGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The fetcher and generator are trait objects so tests can swap in mocks
/// without touching the pipeline.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub tokens: TokenService,
    pub market: Arc<dyn MarketData>,
    pub generator: Arc<dyn ReportGenerator>,
    pub limiter: Arc<RateLimiter>,
}
