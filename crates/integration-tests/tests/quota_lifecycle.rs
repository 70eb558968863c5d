//! Database-backed tests for the credit lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database pointed at by `STUDIO_DATABASE_URL`
//!   (or `DATABASE_URL`)
//!
//! Run with: cargo test -p character-studio-integration-tests -- --ignored

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use character_studio_core::Email;
use character_studio_server::config::AdminConfig;
use character_studio_server::db::RepositoryError;
use character_studio_server::db::accounts::{AccountRepository, NewAccount};
use character_studio_server::models::account::CURRENT_SCHEMA_VERSION;
use character_studio_server::models::{ActivityKind, CurrentAccount};
use character_studio_server::services::{AuthError, AuthService, QuotaService};

/// Connect to the test database and apply migrations.
async fn test_pool() -> PgPool {
    let url = std::env::var("STUDIO_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STUDIO_DATABASE_URL must point at a test database");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("Failed to apply migrations");

    pool
}

/// A configured administrator identity for the auth service.
fn admin_config() -> AdminConfig {
    AdminConfig {
        email: Email::parse("admin@studio.test").expect("valid admin email"),
        secret: secrecy::SecretString::from("integration-test-secret".to_string()),
    }
}

/// Fresh random email so tests can rerun against the same database.
fn unique_email() -> Email {
    Email::parse(&format!("it-{}@example.com", Uuid::new_v4())).expect("valid email")
}

/// Insert an account directly, bypassing the auth service.
async fn seed_account(pool: &PgPool, balance: i64) -> CurrentAccount {
    let account = AccountRepository::new(pool)
        .create(&NewAccount {
            email: unique_email(),
            display_name: "Integration".to_string(),
            password_hash: "unused".to_string(),
            marketing_agreed: false,
            starting_balance: balance,
        })
        .await
        .expect("Failed to seed account");

    CurrentAccount::from(account)
}

/// Re-read the stored balance and purchase flag for an account.
async fn stored_state(pool: &PgPool, email: &Email) -> (i64, bool) {
    let account = AccountRepository::new(pool)
        .get(email)
        .await
        .expect("Failed to read account")
        .expect("Account should exist");

    (account.balance, account.has_ever_purchased)
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_registration_grants_starting_balance() {
    let pool = test_pool().await;
    let admin = admin_config();
    let auth = AuthService::new(&pool, &admin);
    let email = unique_email();

    let account = auth
        .register(email.as_str(), "longenough", "", false)
        .await
        .expect("Registration should succeed");

    assert_eq!(account.balance, 2);
    assert_eq!(account.sign_in_count, 1);
    assert!(!account.has_ever_purchased);
    // Blank display names fall back to the email local part.
    assert_eq!(account.display_name, email.local_part());
    assert_eq!(account.quota.plan_group, "basic");
    assert_eq!(account.quota.max_generations, 1);
    assert_eq!(account.quota.generation_count, 0);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_duplicate_registration_leaves_row_untouched() {
    let pool = test_pool().await;
    let admin = admin_config();
    let auth = AuthService::new(&pool, &admin);
    let email = unique_email();

    auth.register(email.as_str(), "longenough", "First", false)
        .await
        .expect("First registration should succeed");

    // Bump the balance so the row is distinguishable from a fresh one.
    QuotaService::new(&pool)
        .grant(&email, 3)
        .await
        .expect("Grant should succeed");

    let result = auth
        .register(email.as_str(), "otherpassword", "Second", true)
        .await;
    assert!(matches!(result, Err(AuthError::AccountAlreadyExists)));

    let existing = AccountRepository::new(&pool)
        .get(&email)
        .await
        .expect("Failed to read account")
        .expect("Account should exist");
    assert_eq!(existing.display_name, "First");
    assert_eq!(existing.balance, 5);
}

// ============================================================================
// Deduction
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_deduct_decrements_store_and_snapshot() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let mut snapshot = seed_account(&pool, 2).await;

    quota.deduct(&mut snapshot).await;

    assert_eq!(snapshot.balance, 1);
    let (stored, _) = stored_state(&pool, &snapshot.email).await;
    // The session snapshot and the store must agree after a mutation.
    assert_eq!(stored, snapshot.balance);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_deduct_patches_snapshot_when_row_is_gone() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let mut snapshot = seed_account(&pool, 2).await;

    AccountRepository::new(&pool)
        .delete(&snapshot.email)
        .await
        .expect("Failed to delete account");

    // The operation already happened, so the charge must still show locally.
    quota.deduct(&mut snapshot).await;
    assert_eq!(snapshot.balance, 1);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_admission_recovers_after_top_up() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let mut snapshot = seed_account(&pool, 1).await;

    assert!(QuotaService::admit(&snapshot));
    quota.deduct(&mut snapshot).await;
    assert_eq!(snapshot.balance, 0);
    assert!(!QuotaService::admit(&snapshot));

    let email = snapshot.email.clone();
    quota
        .credit(&email, 10, Some(&mut snapshot))
        .await
        .expect("Credit should succeed");
    assert!(QuotaService::admit(&snapshot));
}

// ============================================================================
// Crediting
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_credit_is_additive_and_latches_purchase() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let mut snapshot = seed_account(&pool, 2).await;
    let email = snapshot.email.clone();

    let balance = quota
        .credit(&email, 10, Some(&mut snapshot))
        .await
        .expect("First credit should succeed");
    assert_eq!(balance, 12);
    assert_eq!(snapshot.balance, 12);
    assert!(snapshot.has_ever_purchased);

    let balance = quota
        .credit(&email, 5, None)
        .await
        .expect("Second credit should succeed");
    assert_eq!(balance, 17);

    let (stored, purchased) = stored_state(&pool, &email).await;
    assert_eq!(stored, 17);
    assert!(purchased);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_grant_adds_credits_without_purchase_latch() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let snapshot = seed_account(&pool, 2).await;

    let balance = quota
        .grant(&snapshot.email, 5)
        .await
        .expect("Grant should succeed");
    assert_eq!(balance, 7);

    // A courtesy grant is not a purchase.
    let (stored, purchased) = stored_state(&pool, &snapshot.email).await;
    assert_eq!(stored, 7);
    assert!(!purchased);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_grant_to_unknown_account_is_not_found() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);

    let result = quota.grant(&unique_email(), 5).await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

// ============================================================================
// Activity counters
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_activity_counters_track_completed_operations() {
    let pool = test_pool().await;
    let quota = QuotaService::new(&pool);
    let mut snapshot = seed_account(&pool, 5).await;

    quota
        .record_activity(&mut snapshot, ActivityKind::Generation)
        .await;
    quota
        .record_activity(&mut snapshot, ActivityKind::Generation)
        .await;
    quota.record_activity(&mut snapshot, ActivityKind::Edit).await;

    assert_eq!(snapshot.generation_count, 2);
    assert_eq!(snapshot.edit_count, 1);
    // Counters never touch the balance.
    assert_eq!(snapshot.balance, 5);

    let account = AccountRepository::new(&pool)
        .get(&snapshot.email)
        .await
        .expect("Failed to read account")
        .expect("Account should exist");
    assert_eq!(account.quota.generation_count, 2);
    assert_eq!(account.quota.edit_count, 1);
}

// ============================================================================
// Schema migration
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_version_one_row_migrates_on_first_read() {
    let pool = test_pool().await;
    let email = unique_email();

    // A row as the pre-ledger scheme would have written it.
    sqlx::query(
        "INSERT INTO accounts (email, display_name, role, balance, has_ever_purchased, \
         marketing_agreed, sign_in_count, schema_version, password_hash) \
         VALUES ($1, 'Legacy', 'standard', 1, FALSE, FALSE, 3, 1, 'unused')",
    )
    .bind(&email)
    .execute(&pool)
    .await
    .expect("Failed to insert legacy row");

    let account = AccountRepository::new(&pool)
        .get(&email)
        .await
        .expect("Failed to read account")
        .expect("Account should exist");

    assert_eq!(account.quota.plan_group, "basic");
    assert_eq!(account.quota.max_generations, 1);
    assert_eq!(account.quota.max_edits, 1);
    assert_eq!(account.quota.generation_count, 0);
    assert_eq!(account.quota.edit_count, 0);
    assert_eq!(account.balance, 1);
    assert_eq!(account.sign_in_count, 3);

    // The migration is persisted, not just applied in memory.
    let (version, plan_group): (i32, Option<String>) =
        sqlx::query_as("SELECT schema_version, plan_group FROM accounts WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .expect("Failed to re-read row");
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
    assert_eq!(plan_group.as_deref(), Some("basic"));
}
