//! Support message handlers (user-facing).
//!
//! A standard account only ever talks to the administrator, so the
//! conversation view filters the full time-ordered scan down to messages
//! the account is involved in.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;

use character_studio_core::MessageId;

use crate::db::messages::MessageRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAccount;
use crate::models::{SupportMessage, message::conversation_for};
use crate::state::AppState;

/// Request body for sending a message to the administrator.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

/// Get the signed-in account's conversation with the administrator.
pub async fn conversation(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
) -> Result<Json<Vec<SupportMessage>>> {
    let all = MessageRepository::new(state.pool()).scan().await?;

    Ok(Json(conversation_for(&all, &account.email)))
}

/// Send a message to the administrator.
pub async fn send(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SupportMessage>> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let message = SupportMessage {
        id: MessageId::generate(),
        sender: account.email,
        recipient: state.config().admin.email.clone(),
        sender_role: account.role,
        body: body.to_string(),
        created_at: Utc::now(),
    };

    MessageRepository::new(state.pool()).insert(&message).await?;

    Ok(Json(message))
}
