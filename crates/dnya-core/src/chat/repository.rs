//! Persistence ports for chat messages and chat profiles.
//!
//! Follows the RPITIT repository pattern used across dnya-core.
//! Implementations live in dnya-infra (e.g., `SqliteMessageRepository`).

use dnya_types::chat::{ChatUser, Message};
use dnya_types::error::RepositoryError;

/// Append-only store of messages between users and the assistant.
pub trait MessageRepository: Send + Sync {
    /// Append a message. Messages are never updated afterwards.
    fn save_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recent `limit` messages between `user_id` and the assistant,
    /// returned oldest-first.
    fn recent_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Every message between `user_id` and the assistant, oldest-first.
    fn conversation(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}

/// Store of chat profile and consent records.
pub trait ChatUserRepository: Send + Sync {
    fn find_chat_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatUser>, RepositoryError>> + Send;

    /// Insert `user` unless a record for the same user id exists, then
    /// return the stored record.
    fn insert_if_absent(
        &self,
        user: &ChatUser,
    ) -> impl std::future::Future<Output = Result<ChatUser, RepositoryError>> + Send;

    /// Set the consent flag, creating the record if needed.
    ///
    /// `None` leaves an existing flag untouched and stores `false` on insert.
    fn upsert_consent(
        &self,
        user_id: &str,
        has_consented: Option<bool>,
    ) -> impl std::future::Future<Output = Result<ChatUser, RepositoryError>> + Send;
}
