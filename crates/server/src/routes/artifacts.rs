//! Saved artifact handlers (user-facing).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use character_studio_core::ArtifactId;

use crate::db::artifacts::ArtifactRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAccount;
use crate::models::SavedArtifact;
use crate::state::AppState;

/// List the signed-in account's artifacts, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
) -> Result<Json<Vec<SavedArtifact>>> {
    let artifacts = ArtifactRepository::new(state.pool())
        .list_by_owner(&account.email)
        .await?;

    Ok(Json(artifacts))
}

/// Delete one of the signed-in account's artifacts.
///
/// Administrators may delete anyone's artifact through this route too; the
/// ownership check only binds standard accounts.
pub async fn remove(
    State(state): State<AppState>,
    RequireAccount(account): RequireAccount,
    Path(id): Path<ArtifactId>,
) -> Result<StatusCode> {
    let repo = ArtifactRepository::new(state.pool());

    let artifact = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artifact {id}")))?;

    if artifact.owner != account.email && !account.is_administrator() {
        return Err(AppError::Forbidden("not your artifact".into()));
    }

    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("artifact {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
