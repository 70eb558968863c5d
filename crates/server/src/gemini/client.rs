//! Gemini `generateContent` client implementation.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;

use character_studio_core::GenerationMode;

use crate::config::GeminiConfig;

use super::GeminiError;
use super::prompts::{self, IMAGE_SIZE};
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GeneratedImage, GenerationConfig,
    ImageConfig, InlineData, Part, extract_image,
};

/// Client for the Gemini image generation API.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.api_base.trim_end_matches('/'),
            config.model
        );

        Self {
            inner: Arc::new(GeminiClientInner {
                client: reqwest::Client::new(),
                endpoint,
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Generate a fresh image for a prompt and mode.
    ///
    /// A reference image, when given, is sent ahead of the prompt so the
    /// model reuses the established character design.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` on transport failure, a non-success API status,
    /// or a response with no image part.
    #[instrument(skip(self, reference), fields(mode = %mode))]
    pub async fn generate(
        &self,
        user_prompt: &str,
        mode: GenerationMode,
        reference: Option<&GeneratedImage>,
    ) -> Result<GeneratedImage, GeminiError> {
        let prompt = prompts::generation_prompt(mode, user_prompt, reference.is_some());

        let mut parts = Vec::with_capacity(2);
        if let Some(image) = reference {
            parts.push(inline_part(image));
        }
        parts.push(Part {
            text: Some(prompt),
            inline_data: None,
        });

        self.execute(parts, mode).await
    }

    /// Edit an existing image, preserving the mode's layout.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` on transport failure, a non-success API status,
    /// or a response with no image part.
    #[instrument(skip(self, current, instruction), fields(mode = %mode))]
    pub async fn edit(
        &self,
        current: &GeneratedImage,
        instruction: &str,
        mode: GenerationMode,
    ) -> Result<GeneratedImage, GeminiError> {
        let parts = vec![
            inline_part(current),
            Part {
                text: Some(prompts::edit_prompt(mode, instruction)),
                inline_data: None,
            },
        ];

        self.execute(parts, mode).await
    }

    async fn execute(
        &self,
        parts: Vec<Part>,
        mode: GenerationMode,
    ) -> Result<GeneratedImage, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    image_size: IMAGE_SIZE,
                    aspect_ratio: prompts::aspect_ratio(mode),
                },
            },
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("x-goog-api-key", &self.inner.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Gemini API returned non-success status"
            );
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        let response: GenerateContentResponse = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Gemini response"
                );
                return Err(GeminiError::Parse(e));
            }
        };

        extract_image(response)
    }
}

fn inline_part(image: &GeneratedImage) -> Part {
    Part {
        text: None,
        inline_data: Some(InlineData {
            mime_type: Some(image.mime_type.clone()),
            data: image.data.clone(),
        }),
    }
}
