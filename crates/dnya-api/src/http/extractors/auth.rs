//! Bearer token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and resolves it to the account the
//! token was issued for.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use dnya_types::user::PublicUser;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated account. Extracting this validates the token.
pub struct CurrentUser(pub PublicUser);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let user = state.auth_service.current_user(token).await?;
        Ok(CurrentUser(user))
    }
}

fn extract_bearer(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;
    let value = header.to_str().map_err(|_| {
        AppError::Unauthorized("invalid Authorization header encoding".to_string())
    })?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("expected a Bearer token".to_string()))
}
