//! Conversation handlers: transcript fetch and turn generation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use dnya_core::chat::repository::MessageRepository;
use dnya_types::chat::{Message, TurnReply};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// GET /api/messages/{user_id}/dnya - Full transcript, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state.messages.conversation(&user_id).await.map_err(|e| {
        tracing::error!(user_id, error = %e, "transcript fetch failed");
        AppError::Internal("Failed to fetch messages".to_string())
    })?;
    Ok(Json(MessagesResponse { messages }))
}

/// POST /api/generate-response - Run one conversational turn.
pub async fn generate_response(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<TurnReply>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::invalid_json(&rejection))?;
    let reply = state
        .turn_pipeline
        .handle_turn(&body.user_id, &body.message)
        .await?;
    Ok(Json(reply))
}
