pub mod handlers;
pub mod health;

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let analyze = Router::new()
        .route("/analyze/:sector", get(handlers::handle_analyze))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/login", post(handlers::handle_login))
        .merge(analyze)
        .with_state(state)
}

/// Rate-limit check wrapped around the analyze handler, keyed by the peer
/// address. Runs before authentication: an over-limit client is refused
/// without any token work.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.limiter.check(addr.ip()) {
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}
