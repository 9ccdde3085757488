//! Configuration types for Dnya.
//!
//! `DnyaConfig` represents the top-level `config.toml`. Every field has a
//! default so an absent or partial file still yields a usable config.
//! API keys and the token secret are not part of this file; they come from
//! the environment.

use serde::{Deserialize, Serialize};

use crate::llm::ModelSettings;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnyaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP listener and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// SQLite URL; defaults to `{data_dir}/dnya.db` when unset.
    pub database_url: Option<String>,
    /// Directory holding the built chat client, served for unknown paths.
    pub web_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7000,
            database_url: None,
            web_dir: None,
        }
    }
}

/// Completion and embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name used for logging and factory selection.
    pub provider: String,
    /// Override for the OpenAI-compatible base URL.
    pub base_url: Option<String>,
    /// Session-backed generation path.
    pub primary: ModelSettings,
    /// Direct single-shot path used when the primary call fails.
    pub fallback: ModelSettings,
    /// Upper bound on each completion call before it counts as failed.
    pub timeout_secs: u64,
    /// Embedding model used for similarity search.
    pub embedding_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            base_url: None,
            primary: ModelSettings {
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.7,
                max_tokens: 1024,
            },
            fallback: ModelSettings {
                model: "gemini-2.5-flash".to_string(),
                temperature: 0.8,
                max_tokens: 1024,
            },
            timeout_secs: 30,
            embedding_model: "text-embedding-004".to_string(),
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub index_name: String,
    /// Data-plane host of the index; resolved from the control plane when unset.
    pub index_host: Option<String>,
    /// Upper bound on each retrieval call; expiry yields an empty result.
    pub timeout_ms: u64,
    /// Number of similar snippets folded into the prompt.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_name: "dnyanu".to_string(),
            index_host: None,
            timeout_ms: 3_000,
            top_k: 3,
        }
    }
}

/// Conversation window and session cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Recent messages rendered inline into each prompt.
    pub history_window: usize,
    /// Stored messages replayed into a new session's dialogue.
    pub warmup_messages: usize,
    /// Upper bound on a session's in-memory dialogue.
    pub max_dialogue_messages: usize,
    /// Sessions kept in memory before least-recently-used eviction.
    pub max_sessions: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 6,
            warmup_messages: 20,
            max_dialogue_messages: 20,
            max_sessions: 1_000,
        }
    }
}
