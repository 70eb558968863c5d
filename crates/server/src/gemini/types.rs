//! Wire types for the Gemini `generateContent` endpoint.
//!
//! The REST API speaks camelCase JSON; everything here is renamed
//! accordingly. Only the fields this server uses are modeled.

use serde::{Deserialize, Serialize};

use super::GeminiError;

/// A generated image: raw base64 payload plus its MIME type.
///
/// Kept base64-encoded end to end; the payload goes straight from the API
/// response into the artifact store and out to the client untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Base64-encoded image bytes.
    pub data: String,
    /// MIME type reported by the API (defaults to `image/png`).
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ImageConfig {
    pub image_size: &'static str,
    pub aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Candidate {
    pub content: Option<Content>,
}

/// Extract the first image part from a response.
///
/// Text parts (captions, safety notes) are skipped; a response with no
/// inline image at all is an error.
pub(super) fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, GeminiError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or(GeminiError::NoImage)?;

    for part in parts {
        if let Some(inline) = part.inline_data {
            return Ok(GeneratedImage {
                data: inline.data,
                mime_type: inline.mime_type.unwrap_or_else(|| "image/png".to_string()),
            });
        }
    }

    Err(GeminiError::NoImage)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_skips_text_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {
                        "parts": [
                            {"text": "Here is your character sheet."},
                            {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                        ]
                    }
                }]
            }"#,
        )
        .unwrap();

        let image = extract_image(response).unwrap();
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_extract_image_defaults_mime_type() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"inlineData": {"data": "aGVsbG8="}}]}
                }]
            }"#,
        )
        .unwrap();

        let image = extract_image(response).unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_extract_image_no_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_image(response), Err(GeminiError::NoImage)));
    }

    #[test]
    fn test_extract_image_text_only() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "blocked"}]}}]}"#,
        )
        .unwrap();
        assert!(matches!(extract_image(response), Err(GeminiError::NoImage)));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hi".to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    image_size: "2K",
                    aspect_ratio: "3:4",
                },
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["imageConfig"]["imageSize"], "2K");
        assert_eq!(
            json["generationConfig"]["imageConfig"]["aspectRatio"],
            "3:4"
        );
        // Absent inline data must be omitted, not serialized as null.
        assert!(
            json["contents"][0]["parts"][0]
                .as_object()
                .unwrap()
                .get("inlineData")
                .is_none()
        );
    }
}
