//! Generation orchestrator: session-backed primary call with a single-shot
//! fallback.
//!
//! The primary path replays the user's session dialogue under the session
//! preamble. When it fails (error, timeout, or empty completion) one direct
//! call is made with the turn prompt alone. Neither path retries, and the
//! next turn always starts again from the primary.

use std::sync::Arc;
use std::time::Duration;

use dnya_types::chat::Message as ChatMessage;
use dnya_types::config::{ChatConfig, LlmConfig};
use dnya_types::llm::{CompletionRequest, LlmError, Message, ModelSettings};
use dnya_types::retrieval::RetrievalHandle;
use tracing::{Instrument, info_span};

use super::box_provider::BoxLlmProvider;
use super::prompt::SESSION_PREAMBLE;
use crate::chat::session::{ConversationSession, SessionRegistry};

/// Model and bound settings for both generation paths.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub primary: ModelSettings,
    pub fallback: ModelSettings,
    /// Applied to each completion call separately.
    pub timeout: Duration,
    pub max_dialogue_messages: usize,
}

impl GenerationSettings {
    pub fn from_config(llm: &LlmConfig, chat: &ChatConfig) -> Self {
        Self {
            primary: llm.primary.clone(),
            fallback: llm.fallback.clone(),
            timeout: Duration::from_secs(llm.timeout_secs),
            max_dialogue_messages: chat.max_dialogue_messages,
        }
    }
}

/// How a reply was produced, or why none was.
#[derive(Debug)]
pub enum GenerationOutcome {
    Primary(String),
    Fallback {
        reply: String,
        primary_error: LlmError,
    },
    Failed {
        primary_error: LlmError,
        fallback_error: LlmError,
    },
}

impl GenerationOutcome {
    pub fn reply(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Primary(reply) | GenerationOutcome::Fallback { reply, .. } => {
                Some(reply)
            }
            GenerationOutcome::Failed { .. } => None,
        }
    }

    /// True when the reply did not come from the primary path.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, GenerationOutcome::Primary(_))
    }
}

/// Owns the completion providers and every live conversation session.
pub struct GenerationOrchestrator {
    primary: Arc<BoxLlmProvider>,
    fallback: Arc<BoxLlmProvider>,
    settings: GenerationSettings,
    sessions: SessionRegistry,
}

impl GenerationOrchestrator {
    /// `primary` and `fallback` may be the same provider instance.
    pub fn new(
        primary: Arc<BoxLlmProvider>,
        fallback: Arc<BoxLlmProvider>,
        settings: GenerationSettings,
        max_sessions: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            settings,
            sessions: SessionRegistry::new(max_sessions),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn has_session(&self, user_id: &str) -> bool {
        self.sessions.contains(user_id)
    }

    /// Create a session warmed from `history` unless one already exists.
    ///
    /// Returns true when this call created the session.
    pub fn install_session(
        &self,
        user_id: &str,
        history: &[ChatMessage],
        retrieval: Option<RetrievalHandle>,
    ) -> bool {
        let max = self.settings.max_dialogue_messages;
        let (_, created) = self.sessions.get_or_insert_with(user_id, || {
            ConversationSession::warm(user_id, history, retrieval, max)
        });
        if created {
            tracing::info!(user_id, warmed = history.len(), "conversation session created");
        }
        created
    }

    /// The retrieval handle attached to the user's session, if any.
    pub async fn retrieval_handle(&self, user_id: &str) -> Option<RetrievalHandle> {
        let slot = self.sessions.get(user_id)?;
        let session = slot.lock().await;
        session.retrieval().cloned()
    }

    /// Produce a reply for `prompt_input`.
    ///
    /// `raw_input` is what the user actually typed; on primary success the
    /// session dialogue is extended with it and the reply.
    pub async fn respond(
        &self,
        user_id: &str,
        prompt_input: &str,
        raw_input: &str,
    ) -> GenerationOutcome {
        let max = self.settings.max_dialogue_messages;
        let (slot, _) = self
            .sessions
            .get_or_insert_with(user_id, || ConversationSession::new(user_id, None, max));
        let mut session = slot.lock().await;

        let mut messages = session.dialogue().to_vec();
        messages.push(Message::user(prompt_input));
        let primary_request = CompletionRequest {
            model: self.settings.primary.model.clone(),
            messages,
            system: Some(SESSION_PREAMBLE.to_string()),
            max_tokens: self.settings.primary.max_tokens,
            temperature: Some(self.settings.primary.temperature),
        };

        let primary_error = match self.call(&self.primary, &primary_request).await {
            Ok(reply) => {
                session.record_exchange(raw_input, &reply);
                return GenerationOutcome::Primary(reply);
            }
            Err(e) => e,
        };
        tracing::warn!(
            user_id,
            provider = self.primary.name(),
            error = %primary_error,
            "primary generation failed, trying fallback"
        );

        let fallback_request = CompletionRequest {
            model: self.settings.fallback.model.clone(),
            messages: vec![Message::user(prompt_input)],
            system: None,
            max_tokens: self.settings.fallback.max_tokens,
            temperature: Some(self.settings.fallback.temperature),
        };

        match self.call(&self.fallback, &fallback_request).await {
            Ok(reply) => GenerationOutcome::Fallback {
                reply,
                primary_error,
            },
            Err(fallback_error) => {
                tracing::error!(
                    user_id,
                    provider = self.fallback.name(),
                    error = %fallback_error,
                    "fallback generation failed"
                );
                GenerationOutcome::Failed {
                    primary_error,
                    fallback_error,
                }
            }
        }
    }

    async fn call(
        &self,
        provider: &BoxLlmProvider,
        request: &CompletionRequest,
    ) -> Result<String, LlmError> {
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
        );

        let response = tokio::time::timeout(
            self.settings.timeout,
            provider.complete(request).instrument(span),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.settings.timeout.as_millis() as u64))??;

        if response.content.trim().is_empty() {
            return Err(LlmError::Deserialization(
                "completion contained no text".to_string(),
            ));
        }
        Ok(response.content)
    }
}
