//! Generation mode tag.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown mode string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown generation mode: {0}")]
pub struct GenerationModeError(pub String);

/// The kind of image the studio produces.
///
/// The mode selects the prompt template and output layout sent to the
/// generative API, and is stored on each saved artifact for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Five-section character brand sheet; the master reference for all
    /// other modes.
    #[default]
    BrandSheet,
    /// Four-panel commercial ad storyboard.
    AdStoryboard,
    /// Cinematic animation storyboard keyframes.
    AniStoryboard,
    /// Merchandise collection mockup (bag, mug, case, pin).
    Goods,
    /// 3x3 static sticker set.
    Emoticon,
    /// 4x4 sprite sheet for an animated emoticon loop.
    MovingEmoticon,
}

impl GenerationMode {
    /// All modes, in menu order.
    pub const ALL: [Self; 6] = [
        Self::BrandSheet,
        Self::AdStoryboard,
        Self::AniStoryboard,
        Self::Goods,
        Self::Emoticon,
        Self::MovingEmoticon,
    ];

    /// Stable string form, matching the serialized and stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrandSheet => "brand_sheet",
            Self::AdStoryboard => "ad_storyboard",
            Self::AniStoryboard => "ani_storyboard",
            Self::Goods => "goods",
            Self::Emoticon => "emoticon",
            Self::MovingEmoticon => "moving_emoticon",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GenerationMode {
    type Err = GenerationModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| GenerationModeError(s.to_owned()))
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for GenerationMode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for GenerationMode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for GenerationMode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_modes() {
        for mode in GenerationMode::ALL {
            let parsed: GenerationMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_unknown_mode() {
        assert!("poster".parse::<GenerationMode>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&GenerationMode::MovingEmoticon).unwrap();
        assert_eq!(json, "\"moving_emoticon\"");
        let mode: GenerationMode = serde_json::from_str("\"ad_storyboard\"").unwrap();
        assert_eq!(mode, GenerationMode::AdStoryboard);
    }

    #[test]
    fn test_default_is_brand_sheet() {
        assert_eq!(GenerationMode::default(), GenerationMode::BrandSheet);
    }
}
