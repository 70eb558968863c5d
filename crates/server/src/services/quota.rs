//! Credit admission and accounting.
//!
//! The quota service is the single place that reads or writes the credit
//! balance and the activity counters. Its contract:
//!
//! - [`QuotaService::admit`] is side-effect-free and must be observed `true`
//!   before any metered operation starts.
//! - [`QuotaService::deduct`] runs only after the metered operation has
//!   observably succeeded. A store failure at that point is logged and
//!   swallowed: the operation already happened and cannot be uncharged, so
//!   charging is at-most-once.
//! - [`QuotaService::credit`] is the top-up path and latches
//!   `has_ever_purchased`; [`QuotaService::grant`] is the administrator path
//!   and leaves the latch alone, so a courtesy grant never reads as a
//!   purchase.
//!
//! Successful mutations are mirrored into the caller's session snapshot so
//! the UI stays consistent without a re-fetch.

use sqlx::PgPool;

use character_studio_core::Email;

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::{ActivityKind, CurrentAccount};

/// Credits consumed by one generation or edit.
pub const OPERATION_COST: i64 = 1;

/// Credit admission and accounting service.
pub struct QuotaService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> QuotaService<'a> {
    /// Create a new quota service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Whether this account may start a metered operation.
    ///
    /// Administrators are always admitted; standard accounts need a positive
    /// balance. Pure check, no store access.
    #[must_use]
    pub const fn admit(account: &CurrentAccount) -> bool {
        account.is_administrator() || account.balance > 0
    }

    /// Charge one completed operation and mirror the result into the session
    /// snapshot.
    ///
    /// No-op for administrators. Store failures are logged and swallowed;
    /// the snapshot is then patched optimistically so the UI doesn't show a
    /// charge that will never reconcile upward.
    pub async fn deduct(&self, account: &mut CurrentAccount) {
        if account.is_administrator() {
            return;
        }

        match self
            .accounts
            .adjust_balance(&account.email, -OPERATION_COST)
            .await
        {
            Ok(balance) => account.balance = balance,
            Err(e) => {
                tracing::warn!(
                    account = %account.email,
                    error = %e,
                    "balance deduction failed after completed operation"
                );
                account.balance = (account.balance - OPERATION_COST).max(0);
            }
        }
    }

    /// Add purchased credits and latch the purchase marker.
    ///
    /// Returns the new balance. When the caller's session snapshot is for
    /// the same account, pass it so it reflects the grant immediately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn credit(
        &self,
        email: &Email,
        amount: i64,
        snapshot: Option<&mut CurrentAccount>,
    ) -> Result<i64, RepositoryError> {
        let balance = self.accounts.credit_balance(email, amount).await?;

        if let Some(account) = snapshot
            && account.email == *email
        {
            account.balance = balance;
            account.has_ever_purchased = true;
        }

        tracing::info!(account = %email, amount, balance, "credited account");
        Ok(balance)
    }

    /// Add credits without marking the account as having purchased.
    ///
    /// Administrator grants go through here so `has_ever_purchased` keeps
    /// meaning "completed a top-up". Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn grant(&self, email: &Email, amount: i64) -> Result<i64, RepositoryError> {
        let balance = self.accounts.adjust_balance(email, amount).await?;

        tracing::info!(account = %email, amount, balance, "granted credits");
        Ok(balance)
    }

    /// Record a completed generation or edit in the lifetime counters.
    ///
    /// Independent of the balance and never blocks the operation it records;
    /// failures are logged and swallowed.
    pub async fn record_activity(&self, account: &mut CurrentAccount, kind: ActivityKind) {
        if account.is_administrator() {
            return;
        }

        match self.accounts.record_activity(&account.email, kind).await {
            Ok(count) => match kind {
                ActivityKind::Generation => account.generation_count = count,
                ActivityKind::Edit => account.edit_count = count,
            },
            Err(e) => {
                tracing::warn!(
                    account = %account.email,
                    error = %e,
                    "activity counter update failed"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use character_studio_core::AccountRole;

    fn snapshot(role: AccountRole, balance: i64) -> CurrentAccount {
        CurrentAccount {
            email: Email::parse("user@example.com").unwrap(),
            display_name: "user".to_string(),
            role,
            balance,
            has_ever_purchased: false,
            sign_in_count: 1,
            plan_group: "basic".to_string(),
            max_generations: 1,
            max_edits: 1,
            generation_count: 0,
            edit_count: 0,
        }
    }

    #[test]
    fn test_admit_truth_table() {
        // Administrators are admitted regardless of balance.
        assert!(QuotaService::admit(&snapshot(AccountRole::Administrator, 0)));
        assert!(QuotaService::admit(&snapshot(AccountRole::Administrator, -5)));
        // Standard accounts need a strictly positive balance.
        assert!(QuotaService::admit(&snapshot(AccountRole::Standard, 1)));
        assert!(QuotaService::admit(&snapshot(AccountRole::Standard, 2)));
        assert!(!QuotaService::admit(&snapshot(AccountRole::Standard, 0)));
    }
}
