//! Session-related types.
//!
//! The session holds a denormalized snapshot of the signed-in account for the
//! lifetime of one browser tab. Quota mutations patch the snapshot in place
//! (optimistic update, reconciled on the next full account read); there is no
//! cross-tab invalidation, and the resulting staleness window is accepted.

use serde::{Deserialize, Serialize};

use character_studio_core::{AccountRole, Email};

use super::account::Account;

/// Session-stored account snapshot.
///
/// A denormalized copy of [`Account`], created at sign-in and destroyed at
/// sign-out. Every mutating quota call that succeeds must be mirrored into
/// this snapshot when the identifiers match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAccount {
    /// Account identifier.
    pub email: Email,
    /// Display name shown in the header.
    pub display_name: String,
    /// Standard or administrator.
    pub role: AccountRole,
    /// Remaining credits, mirrored from the store.
    pub balance: i64,
    /// Premium-mode gate, latched by the first top-up.
    pub has_ever_purchased: bool,
    /// Successful sign-ins so far.
    pub sign_in_count: i64,
    /// Legacy plan tier, shown for display only.
    pub plan_group: String,
    /// Legacy generation cap, shown for display only.
    pub max_generations: i32,
    /// Legacy edit cap, shown for display only.
    pub max_edits: i32,
    /// Lifetime generation counter.
    pub generation_count: i64,
    /// Lifetime edit counter.
    pub edit_count: i64,
}

impl CurrentAccount {
    /// Whether this snapshot belongs to the administrator.
    #[must_use]
    pub const fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }
}

impl From<Account> for CurrentAccount {
    fn from(account: Account) -> Self {
        Self {
            email: account.email,
            display_name: account.display_name,
            role: account.role,
            balance: account.balance,
            has_ever_purchased: account.has_ever_purchased,
            sign_in_count: account.sign_in_count,
            plan_group: account.quota.plan_group,
            max_generations: account.quota.max_generations,
            max_edits: account.quota.max_edits,
            generation_count: account.quota.generation_count,
            edit_count: account.quota.edit_count,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in account snapshot.
    pub const CURRENT_ACCOUNT: &str = "current_account";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::account::LegacyQuota;
    use chrono::Utc;

    #[test]
    fn test_snapshot_mirrors_account() {
        let account = Account {
            email: Email::parse("user@example.com").unwrap(),
            display_name: "user".to_string(),
            role: AccountRole::Standard,
            balance: 2,
            has_ever_purchased: false,
            marketing_agreed: true,
            created_at: Utc::now(),
            sign_in_count: 1,
            quota: LegacyQuota::defaults(),
        };

        let snapshot = CurrentAccount::from(account.clone());
        assert_eq!(snapshot.email, account.email);
        assert_eq!(snapshot.balance, 2);
        assert!(!snapshot.is_administrator());
        assert_eq!(snapshot.plan_group, "basic");
    }
}
