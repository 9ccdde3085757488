//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `dnya-core`. Messages are ordered by
//! `created_at`, with the autoincrement `seq` column breaking ties.

use dnya_core::chat::repository::MessageRepository;
use dnya_types::chat::{ASSISTANT_ID, Message};
use dnya_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: String,
    sender_id: String,
    receiver_id: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: parse_uuid(&self.id)?,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            content: self.content,
            timestamp: parse_datetime(&self.created_at)?,
        })
    }
}

fn collect_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Message>, RepositoryError> {
    rows.iter()
        .map(|row| {
            MessageRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_message()
        })
        .collect()
}

const PAIR_FILTER: &str =
    "(sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)";

impl MessageRepository for SqliteMessageRepository {
    async fn save_message(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (id, sender_id, receiver_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(format_datetime(&message.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn recent_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, RepositoryError> {
        let sql = format!(
            "SELECT * FROM messages WHERE {PAIR_FILTER}
             ORDER BY created_at DESC, seq DESC
             LIMIT ?3"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(ASSISTANT_ID)
            .bind(limit as i64)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = collect_messages(&rows)?;
        messages.reverse();
        Ok(messages)
    }

    async fn conversation(&self, user_id: &str) -> Result<Vec<Message>, RepositoryError> {
        let sql =
            format!("SELECT * FROM messages WHERE {PAIR_FILTER} ORDER BY created_at ASC, seq ASC");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(ASSISTANT_ID)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        collect_messages(&rows)
    }
}
