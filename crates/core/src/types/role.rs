//! Account role type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The role attached to an account.
///
/// Exactly one identifier is the administrator, synthesized at sign-in from
/// configuration; every persisted account row is `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// A regular, credit-metered account.
    #[default]
    Standard,
    /// The single administrator; unlimited balance, full override access.
    Administrator,
}

impl AccountRole {
    /// Whether this role is the administrator.
    #[must_use]
    pub const fn is_administrator(self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// Stable string form, matching the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for AccountRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for AccountRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        match s {
            "administrator" => Ok(Self::Administrator),
            // Unknown values fall back to standard rather than poisoning reads
            _ => Ok(Self::Standard),
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for AccountRole {
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
    fn test_is_administrator() {
        assert!(AccountRole::Administrator.is_administrator());
        assert!(!AccountRole::Standard.is_administrator());
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(AccountRole::default(), AccountRole::Standard);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&AccountRole::Administrator).unwrap(),
            "\"administrator\""
        );
        let role: AccountRole = serde_json::from_str("\"standard\"").unwrap();
        assert_eq!(role, AccountRole::Standard);
    }
}
