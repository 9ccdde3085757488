//! Vector retrieval types: per-user namespaces, indexed documents, and
//! similarity search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to one user's isolated partition of the similarity index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetrievalHandle {
    pub namespace: String,
}

impl RetrievalHandle {
    /// The namespace scoped to `user_id`.
    pub fn for_user(user_id: &str) -> Self {
        Self {
            namespace: format!("user-{user_id}"),
        }
    }
}

/// What kind of text an indexed document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    UserMessage,
    AiResponse,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::UserMessage => write!(f, "user_message"),
            DocumentKind::AiResponse => write!(f, "ai_response"),
        }
    }
}

/// A piece of conversation text to index for later similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalDocument {
    pub text: String,
    pub user_id: String,
    pub kind: DocumentKind,
    pub timestamp: DateTime<Utc>,
}

impl RetrievalDocument {
    pub fn new(user_id: &str, text: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.to_string(),
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// A similarity search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarSnippet {
    pub text: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_is_scoped_to_user() {
        assert_eq!(RetrievalHandle::for_user("42").namespace, "user-42");
    }

    #[test]
    fn test_document_kind_serde() {
        let json = serde_json::to_string(&DocumentKind::AiResponse).unwrap();
        assert_eq!(json, "\"ai_response\"");
        assert_eq!(DocumentKind::UserMessage.to_string(), "user_message");
    }
}
