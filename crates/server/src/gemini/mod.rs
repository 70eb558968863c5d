//! Gemini image generation client.
//!
//! # Architecture
//!
//! - Plain REST calls to the `generateContent` endpoint via `reqwest`
//! - Prompt templates per generation mode live in [`prompts`]
//! - One request per generation; no retries (failures are surfaced to the
//!   caller as retryable and the operation is never charged)
//!
//! # Example
//!
//! ```rust,ignore
//! use character_studio_server::gemini::GeminiClient;
//!
//! let client = GeminiClient::new(&config.gemini);
//! let image = client.generate("a space-faring corgi", GenerationMode::BrandSheet, None).await?;
//! ```

mod client;
pub mod prompts;
mod types;

pub use client::GeminiClient;
pub use types::GeneratedImage;

use thiserror::Error;

/// Errors that can occur when calling the Gemini API.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code returned.
        status: u16,
        /// Truncated response body for diagnostics.
        message: String,
    },

    /// The response contained no image part.
    #[error("no image data in response")]
    NoImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_error_display() {
        let err = GeminiError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 429): quota exceeded");
        assert_eq!(GeminiError::NoImage.to_string(), "no image data in response");
    }
}
