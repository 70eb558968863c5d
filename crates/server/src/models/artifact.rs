//! Saved artifact domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use character_studio_core::{ArtifactId, Email, GenerationMode};

use crate::gemini::GeneratedImage;

/// A saved generated image plus its originating prompt and metadata.
///
/// Created only as a side effect of a successful generation or edit; deleted
/// only by explicit user or administrator action; never mutated otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedArtifact {
    /// Unique artifact ID.
    pub id: ArtifactId,
    /// Owning account identifier.
    pub owner: Email,
    /// Base64-encoded image payload.
    pub image_data: String,
    /// MIME type of the payload (e.g., image/png).
    pub mime_type: String,
    /// The prompt that produced the image.
    pub prompt: String,
    /// Which studio mode produced it.
    pub mode: GenerationMode,
    /// When the artifact was saved.
    pub created_at: DateTime<Utc>,
}

impl SavedArtifact {
    /// Build a fresh artifact from a successful generation.
    #[must_use]
    pub fn from_generation(
        owner: Email,
        image: &GeneratedImage,
        prompt: &str,
        mode: GenerationMode,
    ) -> Self {
        Self {
            id: ArtifactId::generate(),
            owner,
            image_data: image.data.clone(),
            mime_type: image.mime_type.clone(),
            prompt: prompt.to_owned(),
            mode,
            created_at: Utc::now(),
        }
    }
}
