//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (e.g., the Gemini embeddings client) live in dnya-infra.

use dnya_types::error::RetrievalError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed a single text into a vector.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, RetrievalError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-004").
    fn model_name(&self) -> &str;
}
