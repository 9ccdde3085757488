//! Similarity index implementations.
//!
//! - `embedder`: embeddings over the OpenAI-compatible `/embeddings` endpoint
//! - `pinecone`: per-user namespaces in a Pinecone serverless index

pub mod embedder;
pub mod pinecone;

use std::time::Duration;

use dnya_core::retrieval::box_store::BoxRetrievalStore;
use dnya_types::config::{LlmConfig, RetrievalConfig};
use dnya_types::error::RetrievalError;
use secrecy::SecretString;

use self::embedder::HttpEmbedder;
use self::pinecone::PineconeStore;
use crate::llm::openai_compat::config::base_url_for;

/// Build the retrieval store, or `None` when no index key is configured.
///
/// The embedder shares the completion provider's endpoint and key.
pub fn create_retrieval_store(
    llm: &LlmConfig,
    retrieval: &RetrievalConfig,
    embedding_key: SecretString,
    index_key: Option<SecretString>,
) -> Result<Option<BoxRetrievalStore>, RetrievalError> {
    let Some(index_key) = index_key else {
        tracing::info!("PINECONE_API_KEY not set, similarity retrieval disabled");
        return Ok(None);
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(retrieval.timeout_ms))
        .build()
        .map_err(|e| RetrievalError::Unavailable(format!("http client: {e}")))?;

    let base_url = llm
        .base_url
        .as_deref()
        .unwrap_or_else(|| base_url_for(&llm.provider));
    let embedder = HttpEmbedder::new(http.clone(), base_url, embedding_key, &llm.embedding_model);

    tracing::info!(
        index = %retrieval.index_name,
        embedding_model = %llm.embedding_model,
        "similarity retrieval enabled"
    );
    Ok(Some(BoxRetrievalStore::new(PineconeStore::new(
        http,
        index_key,
        &retrieval.index_name,
        retrieval.index_host.as_deref(),
        embedder,
    ))))
}

/// Map a transport error, keeping timeouts distinguishable in logs.
pub(crate) fn request_error(context: &str, err: reqwest::Error) -> RetrievalError {
    if err.is_timeout() {
        RetrievalError::Unavailable(format!("{context}: timed out"))
    } else {
        RetrievalError::Request(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn test_no_index_key_disables_retrieval() {
        let store = create_retrieval_store(
            &LlmConfig::default(),
            &RetrievalConfig::default(),
            key("gemini"),
            None,
        )
        .unwrap();
        assert!(store.is_none());
    }

    #[test]
    fn test_index_key_enables_retrieval() {
        let retrieval = RetrievalConfig {
            index_host: Some("dnyanu-abc.svc.pinecone.io".to_string()),
            ..RetrievalConfig::default()
        };
        let store = create_retrieval_store(
            &LlmConfig::default(),
            &retrieval,
            key("gemini"),
            Some(key("pinecone")),
        )
        .unwrap();
        assert!(store.is_some());
    }
}
