use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::extract::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /login
/// Authenticates against the credential store and issues a bearer token.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(creds): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    state.users.verify_password(&creds.username, &creds.password)?;
    let token = state.tokens.issue(&creds.username)?;
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// GET /analyze/:sector
/// Single-pass pipeline: auth (extractor) → validate → fetch → generate →
/// format. The rate check already ran in middleware.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Path(sector): Path<String>,
) -> Result<String, AppError> {
    validate_sector(&sector)?;

    info!("Gathering market data for {sector} (user: {username})");
    let context = state.market.fetch(&sector).await;

    info!("Generating report for {sector}");
    let report = state.generator.generate(&sector, &context).await?;

    Ok(format_report(&sector, Utc::now(), &report))
}

fn validate_sector(sector: &str) -> Result<(), AppError> {
    if sector.is_empty() || !sector.chars().all(char::is_alphabetic) {
        return Err(AppError::Validation(
            "Sector must contain only letters.".to_string(),
        ));
    }
    Ok(())
}

/// Prepends the Markdown header: title-cased sector plus a UTC timestamp,
/// then the generated body unmodified.
fn format_report(sector: &str, generated_at: DateTime<Utc>, body: &str) -> String {
    format!(
        "# Trade Opportunity Report: {}\n\n{}\n\n{}",
        title_case(sector),
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        body
    )
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
