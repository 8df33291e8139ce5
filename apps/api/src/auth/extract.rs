use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::AuthError;
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor that verifies the `Authorization: Bearer <token>` header and
/// yields the authenticated username. Handlers that take this parameter are
/// unreachable without a valid token.
pub struct AuthUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingBearer)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingBearer)?;
        let username = state.tokens.verify(token)?;
        Ok(AuthUser(username))
    }
}
