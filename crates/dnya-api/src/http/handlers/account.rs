//! Signup, login, and current-account handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use dnya_types::user::PublicUser;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// Missing fields deserialize as empty and fail validation in the service.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: &'static str,
    pub token: String,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// POST /api/signup - Register an account.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::invalid_account_json(&rejection))?;
    let outcome = state.auth_service.signup(&body.email, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully",
            token: outcome.token,
            user_id: outcome.user_id.to_string(),
        }),
    ))
}

/// POST /api/login - Exchange credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::invalid_account_json(&rejection))?;
    let outcome = state.auth_service.login(&body.email, &body.password).await?;
    Ok(Json(LoginResponse {
        message: "Logged in successfully",
        token: outcome.token,
        user: outcome.user,
    }))
}

/// GET /api/me - The account behind the bearer token.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}
