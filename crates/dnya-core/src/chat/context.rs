//! Context assembly for a turn: recent stored history plus best-effort
//! similarity recall from the user's index namespace.

use std::sync::Arc;

use dnya_types::chat::Message;
use dnya_types::error::RepositoryError;
use dnya_types::retrieval::{DocumentKind, RetrievalDocument, RetrievalHandle, SimilarSnippet};

use super::best_effort::BestEffort;
use super::repository::MessageRepository;
use crate::retrieval::box_store::BoxRetrievalStore;

/// Gathers the context a prompt is built from.
///
/// Storage reads propagate errors. Every retrieval call goes through
/// [`BestEffort`] and degrades to an empty or absent result.
pub struct ContextAssembler<M: MessageRepository> {
    messages: Arc<M>,
    retrieval: Option<Arc<BoxRetrievalStore>>,
    policy: BestEffort,
}

impl<M: MessageRepository> ContextAssembler<M> {
    /// `retrieval` is `None` when no index is configured.
    pub fn new(
        messages: Arc<M>,
        retrieval: Option<Arc<BoxRetrievalStore>>,
        policy: BestEffort,
    ) -> Self {
        Self {
            messages,
            retrieval,
            policy,
        }
    }

    pub fn retrieval_enabled(&self) -> bool {
        self.retrieval.is_some()
    }

    /// The most recent `limit` messages with the assistant, oldest-first.
    pub async fn recent_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        self.messages.recent_messages(user_id, limit).await
    }

    /// Up to `k` snippets similar to `query`; empty on any failure.
    pub async fn similar(
        &self,
        handle: &RetrievalHandle,
        query: &str,
        k: usize,
    ) -> Vec<SimilarSnippet> {
        let Some(store) = &self.retrieval else {
            return Vec::new();
        };
        self.policy
            .run("similarity_search", store.search(handle, query, k))
            .await
            .unwrap_or_default()
    }

    /// Index `text` into the user's namespace; failures are only logged.
    pub async fn index(
        &self,
        handle: &RetrievalHandle,
        user_id: &str,
        text: &str,
        kind: DocumentKind,
    ) {
        let Some(store) = &self.retrieval else {
            return;
        };
        let document = RetrievalDocument::new(user_id, text, kind);
        self.policy
            .run("index_document", store.upsert(handle, &document))
            .await;
    }

    /// Attach the user's namespace, or `None` when the index is disabled
    /// or unreachable.
    pub async fn attach(&self, user_id: &str) -> Option<RetrievalHandle> {
        let store = self.retrieval.as_ref()?;
        let handle = RetrievalHandle::for_user(user_id);
        self.policy
            .run("attach_namespace", store.attach(&handle))
            .await
            .map(|()| handle)
    }
}
