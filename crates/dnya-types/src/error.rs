use thiserror::Error;

/// Errors from repository operations (used by trait definitions in dnya-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to signup, login, and token verification.
///
/// `InvalidCredentials` deliberately covers both "no such email" and
/// "wrong password" so callers cannot distinguish the two.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("user already exists")]
    Conflict,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token signing failed: {0}")]
    TokenSigning(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors surfaced by a single conversational turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("{0}")]
    Validation(String),

    /// The inbound message could not be stored; no reply was generated.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    /// Both the primary and the fallback completion calls failed.
    #[error("generation unavailable (primary: {primary}; fallback: {fallback})")]
    GenerationUnavailable { primary: String, fallback: String },
}

/// Errors from the vector retrieval backend.
///
/// These never reach an HTTP caller; the turn pipeline absorbs them.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("retrieval request failed: {0}")]
    Request(String),

    #[error("unexpected retrieval response: {0}")]
    Response(String),
}
