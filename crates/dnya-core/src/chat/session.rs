//! In-memory conversation sessions.
//!
//! A `ConversationSession` carries the running dialogue the primary
//! generation path replays on every call. Sessions are created lazily on a
//! user's first turn and held in a bounded [`SessionRegistry`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use dnya_types::chat::Message as ChatMessage;
use dnya_types::llm::{Message, MessageRole};
use dnya_types::retrieval::RetrievalHandle;
use lru::LruCache;

/// Running conversation state for a single user.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    user_id: String,
    dialogue: Vec<Message>,
    max_messages: usize,
    retrieval: Option<RetrievalHandle>,
}

impl ConversationSession {
    /// An empty session.
    pub fn new(user_id: &str, retrieval: Option<RetrievalHandle>, max_messages: usize) -> Self {
        Self {
            user_id: user_id.to_string(),
            dialogue: Vec::new(),
            max_messages,
            retrieval,
        }
    }

    /// A session whose dialogue is replayed from stored messages.
    ///
    /// `history` must be oldest-first. Trailing user messages without a
    /// reply are dropped; the turn in flight supplies its own input.
    pub fn warm(
        user_id: &str,
        history: &[ChatMessage],
        retrieval: Option<RetrievalHandle>,
        max_messages: usize,
    ) -> Self {
        let answered = history
            .iter()
            .rposition(|m| m.is_from_assistant())
            .map_or(0, |i| i + 1);

        let mut session = Self::new(user_id, retrieval, max_messages);
        session.dialogue = history[..answered]
            .iter()
            .map(|m| {
                if m.is_from_assistant() {
                    Message::assistant(m.content.clone())
                } else {
                    Message::user(m.content.clone())
                }
            })
            .collect();
        session.trim();
        session
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn dialogue(&self) -> &[Message] {
        &self.dialogue
    }

    pub fn retrieval(&self) -> Option<&RetrievalHandle> {
        self.retrieval.as_ref()
    }

    /// Append one completed exchange and trim to the dialogue bound.
    pub fn record_exchange(&mut self, input: &str, reply: &str) {
        self.dialogue.push(Message::user(input));
        self.dialogue.push(Message::assistant(reply));
        self.trim();
    }

    fn trim(&mut self) {
        if self.dialogue.len() > self.max_messages {
            let excess = self.dialogue.len() - self.max_messages;
            self.dialogue.drain(..excess);
        }
        // Keep the dialogue starting on a user turn.
        while self
            .dialogue
            .first()
            .is_some_and(|m| m.role == MessageRole::Assistant)
        {
            self.dialogue.remove(0);
        }
    }
}

/// Shared handle to one user's session. The async mutex serializes turns
/// for the same user.
pub type SessionSlot = Arc<tokio::sync::Mutex<ConversationSession>>;

/// Bounded map of user id to session, evicting the least recently used.
pub struct SessionRegistry {
    sessions: parking_lot::Mutex<LruCache<String, SessionSlot>>,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: parking_lot::Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a session and mark it as recently used.
    pub fn get(&self, user_id: &str) -> Option<SessionSlot> {
        self.sessions.lock().get(user_id).cloned()
    }

    /// Whether a session exists, without touching recency.
    pub fn contains(&self, user_id: &str) -> bool {
        self.sessions.lock().contains(user_id)
    }

    /// Return the existing session for `user_id`, or insert the one built by
    /// `create`. `create` runs only when no session exists.
    pub fn get_or_insert_with(
        &self,
        user_id: &str,
        create: impl FnOnce() -> ConversationSession,
    ) -> (SessionSlot, bool) {
        let mut sessions = self.sessions.lock();
        if let Some(slot) = sessions.get(user_id) {
            return (slot.clone(), false);
        }

        let slot: SessionSlot = Arc::new(tokio::sync::Mutex::new(create()));
        if let Some((evicted, _)) = sessions.push(user_id.to_string(), slot.clone()) {
            tracing::debug!(user_id = %evicted, "evicted least recently used session");
        }
        (slot, true)
    }

    /// Drop a user's session. Returns whether one existed.
    pub fn evict(&self, user_id: &str) -> bool {
        self.sessions.lock().pop(user_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
