//! Administrator route handlers.
//!
//! Every handler takes [`RequireAdmin`]; standard sessions get a 403 from
//! the extractor before any of this code runs. Password hashes never leave
//! the repository layer, so the account listing is safe to serialize as-is.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use character_studio_core::{ArtifactId, Email, MessageId};

use crate::db::accounts::AccountRepository;
use crate::db::artifacts::ArtifactRepository;
use crate::db::messages::MessageRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{
    Account, SavedArtifact, SiteConfig, SupportMessage,
    message::{conversation_for, unique_senders},
};
use crate::services::QuotaService;
use crate::state::AppState;

// =============================================================================
// Accounts
// =============================================================================

/// Request body for updating the legacy plan fields.
#[derive(Debug, Deserialize)]
pub struct UpdateLimitsRequest {
    pub plan_group: String,
    pub max_generations: i32,
    pub max_edits: i32,
}

/// Request body for granting credits.
#[derive(Debug, Deserialize)]
pub struct GrantCreditsRequest {
    pub amount: i64,
}

/// Response after a credit grant.
#[derive(Debug, Serialize)]
pub struct GrantCreditsResponse {
    pub balance: i64,
}

/// List every account, newest first.
pub async fn list_accounts(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<Account>>> {
    let accounts = AccountRepository::new(state.pool()).all().await?;
    Ok(Json(accounts))
}

/// Update an account's plan tier and legacy maximums.
pub async fn update_limits(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(email): Path<String>,
    Json(request): Json<UpdateLimitsRequest>,
) -> Result<StatusCode> {
    let email = parse_email(&email)?;

    AccountRepository::new(state.pool())
        .update_limits(
            &email,
            &request.plan_group,
            request.max_generations,
            request.max_edits,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Grant credits to an account.
///
/// Grants are not purchases: the `has_ever_purchased` latch is left alone.
pub async fn grant_credits(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(email): Path<String>,
    Json(request): Json<GrantCreditsRequest>,
) -> Result<Json<GrantCreditsResponse>> {
    if request.amount <= 0 {
        return Err(AppError::BadRequest("amount must be positive".into()));
    }

    let email = parse_email(&email)?;
    let balance = QuotaService::new(state.pool())
        .grant(&email, request.amount)
        .await?;

    Ok(Json(GrantCreditsResponse { balance }))
}

/// Delete an account.
///
/// Does not cascade: the account's artifacts and messages stay behind as
/// orphans.
pub async fn delete_account(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(email): Path<String>,
) -> Result<StatusCode> {
    let email = parse_email(&email)?;

    if email == admin.email {
        return Err(AppError::BadRequest(
            "the administrator account cannot be deleted".into(),
        ));
    }

    if !AccountRepository::new(state.pool()).delete(&email).await? {
        return Err(AppError::NotFound(format!("account {email}")));
    }

    tracing::info!(account = %email, "account deleted by administrator");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Artifacts
// =============================================================================

/// List every artifact, newest first.
pub async fn list_artifacts(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<SavedArtifact>>> {
    let artifacts = ArtifactRepository::new(state.pool()).list_all().await?;
    Ok(Json(artifacts))
}

/// Delete any artifact.
pub async fn delete_artifact(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<ArtifactId>,
) -> Result<StatusCode> {
    if !ArtifactRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("artifact {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Messages
// =============================================================================

/// Inbox view: every standard account that has ever written in, in order of
/// first contact.
#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub senders: Vec<Email>,
}

/// Request body for an administrator reply.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub recipient: String,
    pub body: String,
}

/// Get the inbox sender list.
pub async fn inbox(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<InboxResponse>> {
    let all = MessageRepository::new(state.pool()).scan().await?;

    Ok(Json(InboxResponse {
        senders: unique_senders(&all),
    }))
}

/// Get the conversation with one account.
pub async fn conversation(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(email): Path<String>,
) -> Result<Json<Vec<SupportMessage>>> {
    let email = parse_email(&email)?;
    let all = MessageRepository::new(state.pool()).scan().await?;

    Ok(Json(conversation_for(&all, &email)))
}

/// Reply to an account.
pub async fn reply(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<SupportMessage>> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".into()));
    }

    let recipient = parse_email(&request.recipient)?;

    let message = SupportMessage {
        id: MessageId::generate(),
        sender: admin.email,
        recipient,
        sender_role: admin.role,
        body: body.to_string(),
        created_at: Utc::now(),
    };

    MessageRepository::new(state.pool()).insert(&message).await?;

    Ok(Json(message))
}

/// Delete a message.
pub async fn delete_message(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<MessageId>,
) -> Result<StatusCode> {
    if !MessageRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound(format!("message {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Site config
// =============================================================================

/// Overwrite the SEO site configuration (last writer wins) and refresh the
/// cache.
pub async fn update_site_config(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(config): Json<SiteConfig>,
) -> Result<Json<SiteConfig>> {
    state.put_site_config(config.clone()).await?;

    Ok(Json(config))
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))
}
