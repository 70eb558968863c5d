//! Account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use character_studio_core::{AccountRole, Email};

/// Current account schema version.
///
/// Version 1 rows predate the credit ledger and may be missing the legacy
/// quota columns; they are migrated in place the first time they are read.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// A registered identity with a credit balance and role (domain type).
///
/// The administrator account is never persisted; it is synthesized from
/// configuration at sign-in via [`Account::administrator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique, immutable identifier (email-shaped), primary key.
    pub email: Email,
    /// User- or system-assigned display name.
    pub display_name: String,
    /// Standard or administrator.
    pub role: AccountRole,
    /// Remaining paid operations. Administrators are treated as unlimited
    /// regardless of this value.
    pub balance: i64,
    /// Latched true by the first successful top-up; gates premium modes.
    pub has_ever_purchased: bool,
    /// Marketing consent collected at registration.
    pub marketing_agreed: bool,
    /// Set once at registration, never mutated.
    pub created_at: DateTime<Utc>,
    /// Incremented on every successful authentication.
    pub sign_in_count: i64,
    /// Legacy fixed-quota fields, retained for display.
    #[serde(flatten)]
    pub quota: LegacyQuota,
}

/// Which lifetime activity counter an operation feeds.
///
/// Independent of the credit balance; recorded for analytics and the legacy
/// quota display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A fresh generation.
    Generation,
    /// An edit of an existing image.
    Edit,
}

/// Legacy per-operation-type quota fields.
///
/// Superseded by `balance` but still read and written so older admin views
/// keep rendering; `generation_count`/`edit_count` double as activity
/// counters for analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyQuota {
    /// Plan tier name ("basic" for self-registered accounts).
    pub plan_group: String,
    /// Old fixed generation cap.
    pub max_generations: i32,
    /// Old fixed edit cap.
    pub max_edits: i32,
    /// Lifetime generation count.
    pub generation_count: i64,
    /// Lifetime edit count.
    pub edit_count: i64,
}

impl LegacyQuota {
    /// Defaults applied at registration and by the read-time migration of
    /// pre-ledger rows.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            plan_group: "basic".to_string(),
            max_generations: 1,
            max_edits: 1,
            generation_count: 0,
            edit_count: 0,
        }
    }

    /// The synthetic quota shown for the administrator.
    #[must_use]
    pub fn administrator() -> Self {
        Self {
            plan_group: "admin".to_string(),
            max_generations: 9999,
            max_edits: 9999,
            generation_count: 0,
            edit_count: 0,
        }
    }
}

impl Account {
    /// Synthesize the administrator account from its configured identifier.
    ///
    /// Never written to the store; exists only in the session.
    #[must_use]
    pub fn administrator(email: Email) -> Self {
        Self {
            email,
            display_name: "Administrator".to_string(),
            role: AccountRole::Administrator,
            balance: 0,
            has_ever_purchased: false,
            marketing_agreed: false,
            created_at: Utc::now(),
            sign_in_count: 0,
            quota: LegacyQuota::administrator(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_administrator_is_synthesized() {
        let admin = Account::administrator(Email::parse("admin@studio.test").unwrap());
        assert!(admin.role.is_administrator());
        assert_eq!(admin.balance, 0);
        assert_eq!(admin.quota.plan_group, "admin");
        assert_eq!(admin.quota.max_generations, 9999);
    }

    #[test]
    fn test_legacy_defaults() {
        let quota = LegacyQuota::defaults();
        assert_eq!(quota.plan_group, "basic");
        assert_eq!(quota.max_generations, 1);
        assert_eq!(quota.max_edits, 1);
        assert_eq!(quota.generation_count, 0);
    }
}
