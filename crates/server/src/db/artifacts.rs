//! Artifact repository for database operations.
//!
//! Artifacts are created only as a side effect of a successful generation or
//! edit, and removed only by explicit user or administrator action.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use character_studio_core::{ArtifactId, Email, GenerationMode};

use super::RepositoryError;
use crate::models::SavedArtifact;

#[derive(Debug, sqlx::FromRow)]
struct ArtifactRow {
    id: ArtifactId,
    owner: String,
    image_data: String,
    mime_type: String,
    prompt: String,
    mode: String,
    created_at: DateTime<Utc>,
}

impl ArtifactRow {
    fn into_artifact(self) -> Result<SavedArtifact, RepositoryError> {
        let owner = Email::parse(&self.owner).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid owner email in database: {e}"))
        })?;
        let mode: GenerationMode = self.mode.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid mode in database: {e}"))
        })?;

        Ok(SavedArtifact {
            id: self.id,
            owner,
            image_data: self.image_data,
            mime_type: self.mime_type,
            prompt: self.prompt,
            mode,
            created_at: self.created_at,
        })
    }
}

const SELECT_ARTIFACT: &str =
    "SELECT id, owner, image_data, mime_type, prompt, mode, created_at FROM artifacts";

/// Repository for saved artifact operations.
pub struct ArtifactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArtifactRepository<'a> {
    /// Create a new artifact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a freshly generated artifact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, artifact: &SavedArtifact) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO artifacts (id, owner, image_data, mime_type, prompt, mode, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(artifact.id)
        .bind(&artifact.owner)
        .bind(&artifact.image_data)
        .bind(&artifact.mime_type)
        .bind(&artifact.prompt)
        .bind(artifact.mode)
        .bind(artifact.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List one account's artifacts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_owner(&self, owner: &Email) -> Result<Vec<SavedArtifact>, RepositoryError> {
        let rows: Vec<ArtifactRow> = sqlx::query_as(&format!(
            "{SELECT_ARTIFACT} WHERE owner = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ArtifactRow::into_artifact).collect()
    }

    /// List every artifact, newest first (administrator view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<SavedArtifact>, RepositoryError> {
        let rows: Vec<ArtifactRow> =
            sqlx::query_as(&format!("{SELECT_ARTIFACT} ORDER BY created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(ArtifactRow::into_artifact).collect()
    }

    /// Get a single artifact by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ArtifactId) -> Result<Option<SavedArtifact>, RepositoryError> {
        let row: Option<ArtifactRow> = sqlx::query_as(&format!("{SELECT_ARTIFACT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(ArtifactRow::into_artifact).transpose()
    }

    /// Delete an artifact.
    ///
    /// # Returns
    ///
    /// Returns `true` if the artifact was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ArtifactId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM artifacts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
