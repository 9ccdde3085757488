//! The turn pipeline: one inbound user message in, one assistant reply out.
//!
//! Order of work for a turn:
//! 1. validate the request
//! 2. persist the inbound message (failure aborts the turn)
//! 3. make sure the user has a conversation session
//! 4. recall similar snippets, if the session has an index namespace
//! 5. index the inbound message
//! 6. build the context-enhanced prompt from recent history
//! 7. generate, falling back once if the primary path fails
//! 8. persist the reply (failure is logged; the reply is still returned)
//! 9. index the reply
//!
//! Steps 4, 5 and 9 are best-effort and never fail a turn.

use std::sync::Arc;

use dnya_types::chat::{ASSISTANT_ID, Message, TurnReply};
use dnya_types::config::{ChatConfig, RetrievalConfig};
use dnya_types::error::TurnError;
use dnya_types::retrieval::DocumentKind;

use super::context::ContextAssembler;
use super::repository::MessageRepository;
use crate::llm::orchestrator::{GenerationOrchestrator, GenerationOutcome};
use crate::llm::prompt::TurnPromptBuilder;

/// Window sizes used while handling a turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnSettings {
    /// Recent messages rendered into the prompt.
    pub history_window: usize,
    /// Stored messages replayed into a new session.
    pub warmup_messages: usize,
    /// Similar snippets requested from the index.
    pub top_k: usize,
}

impl TurnSettings {
    pub fn from_config(chat: &ChatConfig, retrieval: &RetrievalConfig) -> Self {
        Self {
            history_window: chat.history_window,
            warmup_messages: chat.warmup_messages,
            top_k: retrieval.top_k,
        }
    }
}

impl Default for TurnSettings {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default(), &RetrievalConfig::default())
    }
}

pub struct TurnPipeline<M: MessageRepository> {
    messages: Arc<M>,
    context: ContextAssembler<M>,
    orchestrator: Arc<GenerationOrchestrator>,
    settings: TurnSettings,
}

impl<M: MessageRepository> TurnPipeline<M> {
    pub fn new(
        messages: Arc<M>,
        context: ContextAssembler<M>,
        orchestrator: Arc<GenerationOrchestrator>,
        settings: TurnSettings,
    ) -> Self {
        Self {
            messages,
            context,
            orchestrator,
            settings,
        }
    }

    pub fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    /// Handle one inbound message from `user_id`.
    #[tracing::instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn handle_turn(&self, user_id: &str, message: &str) -> Result<TurnReply, TurnError> {
        if user_id.trim().is_empty() || message.trim().is_empty() {
            return Err(TurnError::Validation("Message and userId are required".to_string()));
        }
        if user_id == ASSISTANT_ID {
            return Err(TurnError::Validation(format!("userId '{ASSISTANT_ID}' is reserved")));
        }

        let inbound = Message::from_user(user_id, message);
        self.messages.save_message(&inbound).await?;

        self.ensure_session(user_id).await;
        let handle = self.orchestrator.retrieval_handle(user_id).await;

        let snippets = match &handle {
            Some(handle) => {
                self.context
                    .similar(handle, message, self.settings.top_k)
                    .await
            }
            None => Vec::new(),
        };
        if let Some(handle) = &handle {
            self.context
                .index(handle, user_id, message, DocumentKind::UserMessage)
                .await;
        }

        let history = self
            .context
            .recent_history(user_id, self.settings.history_window)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "recent history unavailable, prompting without it");
                vec![inbound.clone()]
            });
        let prompt = TurnPromptBuilder::build(user_id, &history, &snippets, message);

        let outcome = self.orchestrator.respond(user_id, &prompt, message).await;
        let degraded = outcome.is_degraded();
        let reply = match outcome {
            GenerationOutcome::Primary(reply) => reply,
            GenerationOutcome::Fallback {
                reply,
                primary_error,
            } => {
                tracing::info!(error = %primary_error, "replying from fallback path");
                reply
            }
            GenerationOutcome::Failed {
                primary_error,
                fallback_error,
            } => {
                return Err(TurnError::GenerationUnavailable {
                    primary: primary_error.to_string(),
                    fallback: fallback_error.to_string(),
                });
            }
        };

        let outbound = Message::reply_to(&inbound, reply.as_str());
        if let Err(e) = self.messages.save_message(&outbound).await {
            tracing::error!(error = %e, "failed to persist assistant reply");
        }

        if let Some(handle) = &handle {
            self.context
                .index(handle, user_id, &reply, DocumentKind::AiResponse)
                .await;
        }

        Ok(TurnReply {
            reply,
            user_id: user_id.to_string(),
            degraded,
        })
    }

    /// Create the user's session if absent, warmed from stored history and
    /// attached to the index when reachable. Never fails.
    pub async fn ensure_session(&self, user_id: &str) {
        if self.orchestrator.has_session(user_id) {
            return;
        }

        let history = self
            .context
            .recent_history(user_id, self.settings.warmup_messages)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id, error = %e, "could not load history for session warm-up");
                Vec::new()
            });
        let retrieval = self.context.attach(user_id).await;
        if retrieval.is_none() && self.context.retrieval_enabled() {
            tracing::warn!(user_id, "session starting without similarity recall");
        }

        self.orchestrator.install_session(user_id, &history, retrieval);
    }
}
