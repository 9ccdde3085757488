//! SQLite chat profile repository implementation.

use chrono::Utc;
use dnya_core::chat::repository::ChatUserRepository;
use dnya_types::chat::ChatUser;
use dnya_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ChatUserRepository`.
#[derive(Clone)]
pub struct SqliteChatUserRepository {
    pool: DatabasePool,
}

impl SqliteChatUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatUserRow {
    user_id: String,
    has_consented: bool,
    email: Option<String>,
    created_at: String,
}

impl ChatUserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            has_consented: row.try_get("has_consented")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_chat_user(self) -> Result<ChatUser, RepositoryError> {
        Ok(ChatUser {
            user_id: self.user_id,
            has_consented: self.has_consented,
            email: self.email,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn to_chat_user(row: &sqlx::sqlite::SqliteRow) -> Result<ChatUser, RepositoryError> {
    ChatUserRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_chat_user()
}

impl ChatUserRepository for SqliteChatUserRepository {
    async fn find_chat_user(&self, user_id: &str) -> Result<Option<ChatUser>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(to_chat_user).transpose()
    }

    async fn insert_if_absent(&self, user: &ChatUser) -> Result<ChatUser, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query(
            "INSERT INTO chat_users (user_id, has_consented, email, created_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET user_id = excluded.user_id
             RETURNING *",
        )
        .bind(&user.user_id)
        .bind(user.has_consented)
        .bind(&user.email)
        .bind(format_datetime(&user.created_at))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        to_chat_user(&row)
    }

    async fn upsert_consent(
        &self,
        user_id: &str,
        has_consented: Option<bool>,
    ) -> Result<ChatUser, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO chat_users (user_id, has_consented, email, created_at)
             VALUES (?1, COALESCE(?2, 0), NULL, ?3)
             ON CONFLICT(user_id) DO UPDATE
                 SET has_consented = COALESCE(?2, chat_users.has_consented)
             RETURNING *",
        )
        .bind(user_id)
        .bind(has_consented)
        .bind(format_datetime(&Utc::now()))
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        to_chat_user(&row)
    }
}
