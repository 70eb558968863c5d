//! SEO/site configuration singleton.

use serde::{Deserialize, Serialize};

/// SEO metadata and site-wide links, stored as a singleton document.
///
/// Read by every view on load (through the in-process cache), written only
/// from the administrator surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Page title.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Meta keywords.
    pub keywords: String,
    /// Meta author.
    pub author: String,
    /// Optional top-up / support link shown when credits run out.
    pub support_link: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Character Studio AI".to_string(),
            description: "Generate and edit professional character design sheets with a \
                          hosted generative image model."
                .to_string(),
            keywords: "AI, Character Design, 3D Art, Toy Design, Brand Sheet".to_string(),
            author: "Character Studio AI".to_string(),
            support_link: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_support_link() {
        let config = SiteConfig::default();
        assert!(config.support_link.is_none());
        assert_eq!(config.title, "Character Studio AI");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SiteConfig {
            support_link: Some("https://pay.example.com/topup".to_string()),
            ..SiteConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SiteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
