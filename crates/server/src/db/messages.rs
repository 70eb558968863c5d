//! Support message repository.
//!
//! Messages are append-only chat turns between a standard account and the
//! administrator. Conversation views are built in process by filtering a
//! time-ordered scan (see [`crate::models::message`]); there is no
//! server-side two-sided query.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use character_studio_core::{AccountRole, Email, MessageId};

use super::RepositoryError;
use crate::models::SupportMessage;

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: MessageId,
    sender: String,
    recipient: String,
    sender_role: AccountRole,
    body: String,
    created_at: DateTime<Utc>,
}

impl MessageRow {
    fn into_message(self) -> Result<SupportMessage, RepositoryError> {
        let sender = Email::parse(&self.sender).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sender email in database: {e}"))
        })?;
        let recipient = Email::parse(&self.recipient).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid recipient email in database: {e}"))
        })?;

        Ok(SupportMessage {
            id: self.id,
            sender,
            recipient,
            sender_role: self.sender_role,
            body: self.body,
            created_at: self.created_at,
        })
    }
}

/// Repository for support message operations.
pub struct MessageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, message: &SupportMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO support_messages (id, sender, recipient, sender_role, body, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(&message.sender)
        .bind(&message.recipient)
        .bind(message.sender_role)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Scan all messages in time order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn scan(&self) -> Result<Vec<SupportMessage>, RepositoryError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, sender, recipient, sender_role, body, created_at \
             FROM support_messages ORDER BY created_at ASC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    /// Delete a message (administrator moderation).
    ///
    /// # Returns
    ///
    /// Returns `true` if the message was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: MessageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM support_messages WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
