//! Signup and login handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::AuthToken;
use crate::state::AppState;

/// Username and password sent to signup and login.
#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Token handed back after signup or login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: AuthToken,
}

/// Create an account and return its token.
///
/// # Errors
///
/// 400 for an invalid username or a short password, 409 if the username is
/// taken.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let Json(credentials) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (user, token) = state
        .auth()
        .signup(&credentials.username, &credentials.password)
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Exchange a username and password for the account's token.
///
/// # Errors
///
/// 401 if the credentials do not match an account.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<TokenResponse>> {
    let Json(credentials) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (user, token) = state
        .auth()
        .login(&credentials.username, &credentials.password)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "Login failed"))?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse { token }))
}
