//! Route handlers.
//!
//! Thin adapters between the HTTP surface and the services. Every success
//! body is the `{"success": true, "message", "data"}` envelope; errors are
//! rendered by [`ApiError`](crate::error::ApiError).

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use mandap_auth::middleware::BearerAuth;
use mandap_auth::service::{SignInInput, SignUpInput};
use mandap_auth::storage::ProfileInput;

use crate::db;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "message": "Welcome to Mandap Services",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

/// Health probe: `SELECT 1` against the pool decides healthy vs unhealthy.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match db::test_connection(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unhealthy", "error": e.to_string() })),
        ),
    }
}

// ---- Auth ----

pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignUpInput>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.sign_up(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(success_body("Registration successful", session)),
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignInInput>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.sign_in(input).await?;
    Ok((
        StatusCode::OK,
        Json(success_body("Sign in successful", session)),
    ))
}

pub async fn sign_out(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
) -> Result<impl IntoResponse, ApiError> {
    state.auth.sign_out(&auth.token).await?;
    // Sign-out is the one success body without a data payload.
    let body = json!({ "success": true, "message": "Sign out successful" });
    Ok((StatusCode::OK, Json(body)))
}

// ---- Profile ----

pub async fn get_profile(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
) -> Result<impl IntoResponse, ApiError> {
    let fetch = state.profiles.get_profile(auth.partner_id).await?;
    Ok((
        StatusCode::OK,
        Json(success_body(fetch.message, fetch.profile)),
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    BearerAuth(auth): BearerAuth,
    ApiJson(input): ApiJson<ProfileInput>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .profiles
        .update_profile(auth.partner_id, input)
        .await?;
    Ok((
        StatusCode::OK,
        Json(success_body("Profile updated successfully", profile)),
    ))
}

// ---- Locations ----

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// A missing `q` behaves like an empty query and fails the length check.
    #[serde(default)]
    pub q: String,
}

pub async fn search_locations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.locations.search(&params.q).await?;
    Ok((
        StatusCode::OK,
        Json(success_body(outcome.message, outcome.locations)),
    ))
}

fn success_body(message: &str, data: impl Serialize) -> Value {
    json!({
        "success": true,
        "message": message,
        "data": data,
    })
}
