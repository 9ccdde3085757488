//! Remote embedding client.
//!
//! Implements the `Embedder` trait from `dnya-core` against an
//! OpenAI-compatible `/embeddings` endpoint (Gemini's by default, with
//! `text-embedding-004`).

use dnya_core::retrieval::embedder::Embedder;
use dnya_types::error::RetrievalError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::request_error;

pub struct HttpEmbedder {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl HttpEmbedder {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

fn first_embedding(response: EmbeddingResponse) -> Result<Vec<f32>, RetrievalError> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RetrievalError::Embedding("response contained no embedding".to_string()))
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let response = self
            .http
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&EmbeddingRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await
            .map_err(|e| request_error("embeddings", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Embedding(format!("{status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("invalid response: {e}")))?;
        first_embedding(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
