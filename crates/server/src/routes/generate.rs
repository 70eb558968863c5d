//! Metered generation and edit handlers.
//!
//! Both handlers follow the same shape: admit, call the model, persist the
//! artifact, then charge. The charge comes strictly after observable
//! success, so a failed generation is never billed; conversely a crash
//! between success and charge leaves the operation free (at-most-once
//! charging, accepted).

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use character_studio_core::{ArtifactId, GenerationMode};

use crate::db::artifacts::ArtifactRepository;
use crate::error::{AppError, Result};
use crate::gemini::GeneratedImage;
use crate::middleware::{RequireAccount, set_current_account};
use crate::models::{ActivityKind, CurrentAccount, SavedArtifact};
use crate::services::QuotaService;
use crate::state::AppState;

/// Generation request body.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub mode: GenerationMode,
    /// Previously generated image to keep the character design consistent.
    pub reference: Option<GeneratedImage>,
}

/// Edit request body.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    /// The image being edited, as returned by a previous call.
    pub image: GeneratedImage,
    pub instruction: String,
    #[serde(default)]
    pub mode: GenerationMode,
}

/// Response for both generation and edit.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub image: GeneratedImage,
    /// Artifact ID under which the result was saved, when the save succeeded.
    pub artifact_id: Option<ArtifactId>,
    /// Balance after the charge, mirrored from the session snapshot.
    pub balance: i64,
}

/// Generate a fresh image (one credit).
pub async fn generate(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(mut account): RequireAccount,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".into()));
    }

    if !QuotaService::admit(&account) {
        return Err(AppError::AdmissionDenied);
    }

    let image = state
        .gemini()
        .generate(prompt, request.mode, request.reference.as_ref())
        .await?;

    finish(
        &state,
        &session,
        &mut account,
        image,
        prompt,
        request.mode,
        ActivityKind::Generation,
    )
    .await
}

/// Edit an existing image (one credit).
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(mut account): RequireAccount,
    Json(request): Json<EditRequest>,
) -> Result<Json<GenerateResponse>> {
    let instruction = request.instruction.trim();
    if instruction.is_empty() {
        return Err(AppError::BadRequest("instruction must not be empty".into()));
    }

    if !QuotaService::admit(&account) {
        return Err(AppError::AdmissionDenied);
    }

    let image = state
        .gemini()
        .edit(&request.image, instruction, request.mode)
        .await?;

    finish(
        &state,
        &session,
        &mut account,
        image,
        instruction,
        request.mode,
        ActivityKind::Edit,
    )
    .await
}

/// Shared post-success path: save, charge, record, patch the session.
///
/// Everything in here is best-effort; the image already exists and is
/// returned to the client regardless of accounting failures.
async fn finish(
    state: &AppState,
    session: &Session,
    account: &mut CurrentAccount,
    image: GeneratedImage,
    prompt: &str,
    mode: GenerationMode,
    kind: ActivityKind,
) -> Result<Json<GenerateResponse>> {
    let artifact = SavedArtifact::from_generation(account.email.clone(), &image, prompt, mode);
    let artifact_id = match ArtifactRepository::new(state.pool())
        .insert(&artifact)
        .await
    {
        Ok(()) => Some(artifact.id),
        Err(e) => {
            tracing::warn!(account = %account.email, error = %e, "artifact save failed");
            None
        }
    };

    let quota = QuotaService::new(state.pool());
    quota.deduct(account).await;
    quota.record_activity(account, kind).await;

    if let Err(e) = set_current_account(session, account).await {
        tracing::warn!(account = %account.email, error = %e, "session snapshot update failed");
    }

    Ok(Json(GenerateResponse {
        image,
        artifact_id,
        balance: account.balance,
    }))
}
