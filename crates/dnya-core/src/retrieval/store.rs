//! RetrievalStore trait definition.
//!
//! Every operation is scoped to one user's namespace through a
//! [`RetrievalHandle`]; a store never mixes documents across namespaces.

use dnya_types::error::RetrievalError;
use dnya_types::retrieval::{RetrievalDocument, RetrievalHandle, SimilarSnippet};

/// Trait for similarity index backends.
///
/// Implementations live in dnya-infra (e.g., `PineconeStore`).
/// Callers treat every error as non-fatal.
pub trait RetrievalStore: Send + Sync {
    /// Check that the namespace behind `handle` is reachable.
    fn attach(
        &self,
        handle: &RetrievalHandle,
    ) -> impl std::future::Future<Output = Result<(), RetrievalError>> + Send;

    /// Return up to `k` documents most similar to `query`, best match first.
    fn search(
        &self,
        handle: &RetrievalHandle,
        query: &str,
        k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SimilarSnippet>, RetrievalError>> + Send;

    /// Embed and store a document in the namespace.
    fn upsert(
        &self,
        handle: &RetrievalHandle,
        document: &RetrievalDocument,
    ) -> impl std::future::Future<Output = Result<(), RetrievalError>> + Send;
}
