//! Pinecone-backed similarity index.
//!
//! Implements `RetrievalStore` from `dnya-core` over Pinecone's REST data
//! plane. Each user's documents live in their own namespace; the document
//! text is stored in vector metadata so search hits need no second lookup.
//!
//! The index host comes from config or is resolved once through the
//! control plane (`GET /indexes/{name}`).

use dnya_core::retrieval::embedder::Embedder;
use dnya_core::retrieval::store::RetrievalStore;
use dnya_types::error::RetrievalError;
use dnya_types::retrieval::{RetrievalDocument, RetrievalHandle, SimilarSnippet};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::request_error;

pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-10";

pub struct PineconeStore<E: Embedder> {
    http: reqwest::Client,
    api_key: SecretString,
    index_name: String,
    control_url: String,
    host: OnceCell<String>,
    embedder: E,
}

impl<E: Embedder> PineconeStore<E> {
    /// `index_host` skips control-plane resolution when set.
    pub fn new(
        http: reqwest::Client,
        api_key: SecretString,
        index_name: &str,
        index_host: Option<&str>,
        embedder: E,
    ) -> Self {
        let host = match index_host {
            Some(h) => OnceCell::new_with(Some(normalize_host(h))),
            None => OnceCell::new(),
        };
        Self {
            http,
            api_key,
            index_name: index_name.to_string(),
            control_url: CONTROL_PLANE_URL.to_string(),
            host,
            embedder,
        }
    }

    async fn host(&self) -> Result<&str, RetrievalError> {
        self.host
            .get_or_try_init(|| self.describe_index())
            .await
            .map(String::as_str)
    }

    async fn describe_index(&self) -> Result<String, RetrievalError> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(|e| request_error("describe index", e))?;
        let description: IndexDescription = read_json(response, "describe index").await?;
        tracing::info!(index = %self.index_name, host = %description.host, "resolved index host");
        Ok(normalize_host(&description.host))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RetrievalError> {
        let url = format!("{}{path}", self.host().await?);
        let response = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(path, e))?;
        read_json(response, path).await
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

async fn read_json<R: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    context: &str,
) -> Result<R, RetrievalError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 | 403 | 404 => RetrievalError::Unavailable(format!("{context}: {status}: {body}")),
            _ => RetrievalError::Request(format!("{context}: {status}: {body}")),
        });
    }
    response
        .json()
        .await
        .map_err(|e| RetrievalError::Response(format!("{context}: {e}")))
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

#[derive(Serialize)]
struct DescribeStatsRequest {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    dimension: Option<u32>,
    #[serde(default)]
    total_vector_count: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<VectorMetadata>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VectorMetadata {
    text: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector>,
    namespace: &'a str,
}

#[derive(Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: VectorMetadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u32,
}

fn into_snippets(response: QueryResponse) -> Vec<SimilarSnippet> {
    response
        .matches
        .into_iter()
        .filter_map(|m| {
            m.metadata.map(|meta| SimilarSnippet {
                text: meta.text,
                score: m.score,
            })
        })
        .collect()
}

fn upsert_vector(document: &RetrievalDocument, values: Vec<f32>) -> UpsertVector {
    UpsertVector {
        id: Uuid::now_v7().to_string(),
        values,
        metadata: VectorMetadata {
            text: document.text.clone(),
            user_id: Some(document.user_id.clone()),
            kind: Some(document.kind.to_string()),
            timestamp: Some(document.timestamp.to_rfc3339()),
        },
    }
}

// ---------------------------------------------------------------------------
// RetrievalStore impl
// ---------------------------------------------------------------------------

impl<E: Embedder> RetrievalStore for PineconeStore<E> {
    async fn attach(&self, handle: &RetrievalHandle) -> Result<(), RetrievalError> {
        let stats: IndexStats = self
            .post("/describe_index_stats", &DescribeStatsRequest {})
            .await?;
        tracing::debug!(
            namespace = %handle.namespace,
            dimension = ?stats.dimension,
            total_vectors = ?stats.total_vector_count,
            "attached to index namespace"
        );
        Ok(())
    }

    async fn search(
        &self,
        handle: &RetrievalHandle,
        query: &str,
        k: usize,
    ) -> Result<Vec<SimilarSnippet>, RetrievalError> {
        let vector = self.embedder.embed(query).await?;
        let response: QueryResponse = self
            .post(
                "/query",
                &QueryRequest {
                    namespace: &handle.namespace,
                    vector,
                    top_k: k,
                    include_metadata: true,
                },
            )
            .await?;
        Ok(into_snippets(response))
    }

    async fn upsert(
        &self,
        handle: &RetrievalHandle,
        document: &RetrievalDocument,
    ) -> Result<(), RetrievalError> {
        let values = self.embedder.embed(&document.text).await?;
        let response: UpsertResponse = self
            .post(
                "/vectors/upsert",
                &UpsertRequest {
                    vectors: vec![upsert_vector(document, values)],
                    namespace: &handle.namespace,
                },
            )
            .await?;
        tracing::debug!(
            namespace = %handle.namespace,
            kind = %document.kind,
            upserted = response.upserted_count,
            "document indexed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dnya_types::retrieval::DocumentKind;

    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("dnyanu-abc123.svc.pinecone.io"),
            "https://dnyanu-abc123.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5081/"), "http://localhost:5081");
    }

    #[test]
    fn test_query_request_shape() {
        let body = serde_json::to_value(QueryRequest {
            namespace: "user-42",
            vector: vec![0.5, 0.25],
            top_k: 3,
            include_metadata: true,
        })
        .unwrap();
        assert_eq!(body["namespace"], "user-42");
        assert_eq!(body["topK"], 3);
        assert_eq!(body["includeMetadata"], true);
    }

    #[test]
    fn test_matches_without_metadata_are_skipped() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"matches":[
                {"id":"a","score":0.92,"metadata":{"text":"I love chai","userId":"42","type":"user_message"}},
                {"id":"b","score":0.80}
            ],"namespace":"user-42"}"#,
        )
        .unwrap();
        let snippets = into_snippets(response);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "I love chai");
    }

    #[test]
    fn test_upsert_vector_metadata() {
        let doc = RetrievalDocument::new("42", "good night", DocumentKind::AiResponse);
        let vector = upsert_vector(&doc, vec![0.1]);
        let json = serde_json::to_value(&vector).unwrap();
        assert_eq!(json["metadata"]["text"], "good night");
        assert_eq!(json["metadata"]["userId"], "42");
        assert_eq!(json["metadata"]["type"], "ai_response");
    }

    #[test]
    fn test_empty_query_response() {
        let response: QueryResponse = serde_json::from_str(r#"{"namespace":"user-1"}"#).unwrap();
        assert!(into_snippets(response).is_empty());
    }
}
