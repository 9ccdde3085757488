//! Chat profile and consent handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use dnya_types::chat::{ASSISTANT_ID, ChatUser};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    #[serde(default)]
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentBody {
    #[serde(default)]
    pub user_id: String,
    /// Absent leaves an existing flag untouched.
    pub has_consented: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: ChatUser,
}

fn require_user_id(user_id: &str) -> Result<&str, AppError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("User ID is required".to_string()));
    }
    if user_id == ASSISTANT_ID {
        return Err(AppError::Validation(format!("User ID '{ASSISTANT_ID}' is reserved")));
    }
    Ok(user_id)
}

/// POST /api/users - Fetch the chat profile, creating it on first sight.
pub async fn get_or_create_user(
    State(state): State<AppState>,
    payload: Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::invalid_json(&rejection))?;
    let user_id = require_user_id(&body.user_id)?;
    let user = state
        .profile_service
        .get_or_create(user_id, body.email)
        .await
        .map_err(|e| {
            tracing::error!(user_id, error = %e, "chat profile lookup failed");
            AppError::Internal("Server error".to_string())
        })?;
    Ok(Json(ProfileResponse { user }))
}

/// PUT /api/users/consent - Record the consent flag.
pub async fn update_consent(
    State(state): State<AppState>,
    payload: Result<Json<ConsentBody>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::invalid_json(&rejection))?;
    let user_id = require_user_id(&body.user_id)?;
    let user = state
        .profile_service
        .set_consent(user_id, body.has_consented)
        .await
        .map_err(|e| {
            tracing::error!(user_id, error = %e, "consent update failed");
            AppError::Internal("Server error".to_string())
        })?;
    Ok(Json(ProfileResponse { user }))
}
