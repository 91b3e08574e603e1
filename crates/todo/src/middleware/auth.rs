//! Token authentication extractor.
//!
//! Clients send `Authorization: Token <key>`; the scheme name is matched
//! case-insensitively.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::state::AppState;

/// Authorization scheme expected in the `Authorization` header.
pub const AUTH_SCHEME: &str = "Token";

/// Extractor that requires a valid API token.
///
/// Rejects with 401 when the header is missing, malformed, or names an
/// unknown token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let key = token_key(header).ok_or(AppError::Unauthenticated)?;
        let user = state.auth().authenticate(key).await?;

        set_sentry_user(user.id.as_i32(), user.username.as_str());
        tracing::debug!(user_id = %user.id, "Authenticated request");

        Ok(Self(user))
    }
}

/// Extract the key from a `Token <key>` header value.
fn token_key(header: &str) -> Option<&str> {
    let (scheme, key) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(AUTH_SCHEME) {
        return None;
    }
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}
