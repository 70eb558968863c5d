//! Account repository for database operations.
//!
//! Accounts are keyed by email. All numeric mutations (`balance`,
//! `sign_in_count`, activity counters) go through atomic field-level
//! increments rather than read-modify-write, so concurrent tabs cannot lose
//! updates. Rows written by the old fixed-quota scheme carry
//! `schema_version = 1` and may have NULL legacy columns; they are migrated
//! in place the first time [`AccountRepository::get`] touches them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use character_studio_core::{AccountRole, Email};

use super::RepositoryError;
use crate::models::account::{Account, ActivityKind, CURRENT_SCHEMA_VERSION, LegacyQuota};

/// Data required to insert a new account row.
#[derive(Debug)]
pub struct NewAccount {
    /// Identifier; must not already exist.
    pub email: Email,
    /// Display name (already defaulted by the auth service).
    pub display_name: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Marketing consent from the sign-up form.
    pub marketing_agreed: bool,
    /// Credits granted at registration.
    pub starting_balance: i64,
}

/// Raw account row as stored. Legacy quota columns are nullable because
/// version-1 rows predate them.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    email: String,
    display_name: String,
    role: AccountRole,
    balance: i64,
    has_ever_purchased: bool,
    marketing_agreed: bool,
    created_at: DateTime<Utc>,
    sign_in_count: i64,
    plan_group: Option<String>,
    max_generations: Option<i32>,
    max_edits: Option<i32>,
    generation_count: Option<i64>,
    edit_count: Option<i64>,
    schema_version: i32,
    password_hash: String,
}

const SELECT_ACCOUNT: &str = "SELECT email, display_name, role, balance, has_ever_purchased, \
     marketing_agreed, created_at, sign_in_count, plan_group, max_generations, max_edits, \
     generation_count, edit_count, schema_version, password_hash FROM accounts";

impl AccountRow {
    /// Convert to a fully-populated domain account, filling legacy columns
    /// with their migration defaults when absent. The password hash never
    /// leaves the repository layer.
    fn into_account(self) -> Result<Account, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let defaults = LegacyQuota::defaults();
        Ok(Account {
            email,
            display_name: self.display_name,
            role: self.role,
            balance: self.balance,
            has_ever_purchased: self.has_ever_purchased,
            marketing_agreed: self.marketing_agreed,
            created_at: self.created_at,
            sign_in_count: self.sign_in_count,
            quota: LegacyQuota {
                plan_group: self.plan_group.unwrap_or(defaults.plan_group),
                max_generations: self.max_generations.unwrap_or(defaults.max_generations),
                max_edits: self.max_edits.unwrap_or(defaults.max_edits),
                generation_count: self.generation_count.unwrap_or(defaults.generation_count),
                edit_count: self.edit_count.unwrap_or(defaults.edit_count),
            },
        })
    }
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account by email, applying the one-time schema migration to
    /// pre-ledger rows so callers always see a fully-populated record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) if row.schema_version < CURRENT_SCHEMA_VERSION => {
                let account = row.into_account()?;
                self.write_migration(&account).await?;
                Ok(Some(account))
            }
            Some(row) => Ok(Some(row.into_account()?)),
            None => Ok(None),
        }
    }

    /// Persist the read-time migration of a version-1 row: fill the legacy
    /// quota columns with their defaults and bump the schema version.
    async fn write_migration(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE accounts SET plan_group = $2, max_generations = $3, max_edits = $4, \
             generation_count = $5, edit_count = $6, schema_version = $7 WHERE email = $1",
        )
        .bind(&account.email)
        .bind(&account.quota.plan_group)
        .bind(account.quota.max_generations)
        .bind(account.quota.max_edits)
        .bind(account.quota.generation_count)
        .bind(account.quota.edit_count)
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(self.pool)
        .await?;

        tracing::info!(account = %account.email, "migrated account row to current schema");
        Ok(())
    }

    /// List every account, newest first. Rows are populated with legacy
    /// defaults in memory but not migrated on disk (this is a display path).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows: Vec<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} ORDER BY created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    /// Whether an account row exists for this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new account with registration defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists; the
    /// existing row is left untouched.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewAccount) -> Result<Account, RepositoryError> {
        let defaults = LegacyQuota::defaults();
        let row: AccountRow = sqlx::query_as(
            "INSERT INTO accounts (email, display_name, role, balance, has_ever_purchased, \
             marketing_agreed, sign_in_count, plan_group, max_generations, max_edits, \
             generation_count, edit_count, schema_version, password_hash) \
             VALUES ($1, $2, $3, $4, FALSE, $5, 1, $6, $7, $8, 0, 0, $9, $10) \
             RETURNING email, display_name, role, balance, has_ever_purchased, \
             marketing_agreed, created_at, sign_in_count, plan_group, max_generations, \
             max_edits, generation_count, edit_count, schema_version, password_hash",
        )
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(AccountRole::Standard)
        .bind(new.starting_balance)
        .bind(new.marketing_agreed)
        .bind(&defaults.plan_group)
        .bind(defaults.max_generations)
        .bind(defaults.max_edits)
        .bind(CURRENT_SCHEMA_VERSION)
        .bind(&new.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("account already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_account()
    }

    /// Get an account along with its password hash, for credential checks.
    ///
    /// Returns `None` if the account doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("{SELECT_ACCOUNT} WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let hash = row.password_hash.clone();
        let account = if row.schema_version < CURRENT_SCHEMA_VERSION {
            let account = row.into_account()?;
            self.write_migration(&account).await?;
            account
        } else {
            row.into_account()?
        };

        Ok(Some((account, hash)))
    }

    /// Delete an account row.
    ///
    /// Does not cascade to artifacts or support messages; orphaned rows are
    /// accepted.
    ///
    /// # Returns
    ///
    /// Returns `true` if the account was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, email: &Email) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM accounts WHERE email = $1")
            .bind(email)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Administrator override of the legacy plan tier and maximums.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_limits(
        &self,
        email: &Email,
        plan_group: &str,
        max_generations: i32,
        max_edits: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE accounts SET plan_group = $2, max_generations = $3, max_edits = $4 \
             WHERE email = $1",
        )
        .bind(email)
        .bind(plan_group)
        .bind(max_generations)
        .bind(max_edits)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Atomically adjust the balance by `delta` and return the new value.
    ///
    /// Negative deltas must be preceded by an admission check; the table's
    /// `balance >= 0` constraint backstops the invariant under races.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails (including a
    /// constraint violation from a lost race).
    pub async fn adjust_balance(&self, email: &Email, delta: i64) -> Result<i64, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE accounts SET balance = balance + $2 WHERE email = $1 RETURNING balance",
        )
        .bind(email)
        .bind(delta)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(balance,)| balance)
            .ok_or(RepositoryError::NotFound)
    }

    /// Atomically add purchased credits and latch `has_ever_purchased`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn credit_balance(&self, email: &Email, amount: i64) -> Result<i64, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE accounts SET balance = balance + $2, has_ever_purchased = TRUE \
             WHERE email = $1 RETURNING balance",
        )
        .bind(email)
        .bind(amount)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(balance,)| balance)
            .ok_or(RepositoryError::NotFound)
    }

    /// Atomically increment a per-kind activity counter and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn record_activity(
        &self,
        email: &Email,
        kind: ActivityKind,
    ) -> Result<i64, RepositoryError> {
        let query = match kind {
            ActivityKind::Generation => {
                "UPDATE accounts SET generation_count = COALESCE(generation_count, 0) + 1 \
                 WHERE email = $1 RETURNING generation_count"
            }
            ActivityKind::Edit => {
                "UPDATE accounts SET edit_count = COALESCE(edit_count, 0) + 1 \
                 WHERE email = $1 RETURNING edit_count"
            }
        };

        let row: Option<(Option<i64>,)> = sqlx::query_as(query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        row.map(|(count,)| count.unwrap_or(0))
            .ok_or(RepositoryError::NotFound)
    }

    /// Atomically increment the sign-in counter and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn record_sign_in(&self, email: &Email) -> Result<i64, RepositoryError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE accounts SET sign_in_count = sign_in_count + 1 WHERE email = $1 \
             RETURNING sign_in_count",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(count,)| count).ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stored_row(schema_version: i32) -> AccountRow {
        AccountRow {
            email: "stored@example.com".to_string(),
            display_name: "Stored".to_string(),
            role: AccountRole::Standard,
            balance: 2,
            has_ever_purchased: false,
            marketing_agreed: false,
            created_at: Utc::now(),
            sign_in_count: 1,
            plan_group: None,
            max_generations: None,
            max_edits: None,
            generation_count: None,
            edit_count: None,
            schema_version,
            password_hash: "hash".to_string(),
        }
    }

    #[test]
    fn test_version_one_row_gets_legacy_defaults() {
        let account = stored_row(1).into_account().unwrap();
        let defaults = LegacyQuota::defaults();

        assert_eq!(account.quota.plan_group, defaults.plan_group);
        assert_eq!(account.quota.max_generations, defaults.max_generations);
        assert_eq!(account.quota.max_edits, defaults.max_edits);
        assert_eq!(account.quota.generation_count, 0);
        assert_eq!(account.quota.edit_count, 0);
        // The non-quota fields pass through untouched.
        assert_eq!(account.balance, 2);
        assert_eq!(account.sign_in_count, 1);
    }

    #[test]
    fn test_stored_legacy_values_win_over_defaults() {
        let mut row = stored_row(CURRENT_SCHEMA_VERSION);
        row.plan_group = Some("pro".to_string());
        row.max_generations = Some(30);
        row.generation_count = Some(7);

        let account = row.into_account().unwrap();
        assert_eq!(account.quota.plan_group, "pro");
        assert_eq!(account.quota.max_generations, 30);
        assert_eq!(account.quota.generation_count, 7);
    }

    #[test]
    fn test_invalid_stored_email_is_corruption() {
        let mut row = stored_row(CURRENT_SCHEMA_VERSION);
        row.email = "not an email".to_string();

        assert!(matches!(
            row.into_account(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
