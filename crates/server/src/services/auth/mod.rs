//! Authentication service.
//!
//! Password registration and sign-in for standard accounts, plus the
//! configured administrator identity. The administrator takes a constant
//! special-case path: its credential is checked against the config secret,
//! never the argon2 hash, and its account is synthesized rather than read
//! from the store.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use character_studio_core::Email;

use crate::config::AdminConfig;
use crate::db::RepositoryError;
use crate::db::accounts::{AccountRepository, NewAccount};
use crate::models::Account;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Credits granted to every newly registered account.
pub const STARTING_BALANCE: i64 = 2;

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
    admin: &'a AdminConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, admin: &'a AdminConfig) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            admin,
        }
    }

    /// Register a new account with email and password.
    ///
    /// The account starts with [`STARTING_BALANCE`] credits, a sign-in count
    /// of one, and the legacy quota defaults. A blank display name is derived
    /// from the email's local part.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::AccountAlreadyExists` if the email is already taken;
    /// the existing row is left untouched.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        marketing_agreed: bool,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        // The administrator identity is reserved; it never gets a stored row.
        if email == self.admin.email {
            return Err(AuthError::AccountAlreadyExists);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let display_name = match display_name.trim() {
            "" => email.local_part().to_string(),
            name => name.to_string(),
        };

        let account = self
            .accounts
            .create(&NewAccount {
                email,
                display_name,
                password_hash,
                marketing_agreed,
                starting_balance: STARTING_BALANCE,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(account = %account.email, "registered new account");
        Ok(account)
    }

    /// Sign in with email and password.
    ///
    /// The configured administrator email short-circuits to a secret
    /// comparison and a synthesized account. Standard accounts get their
    /// hash verified, their schema migrated if needed, and their sign-in
    /// counter incremented.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AccountNotFound` if no account exists for the email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        if email == self.admin.email {
            if password == self.admin.secret.expose_secret() {
                tracing::info!("administrator signed in");
                return Ok(Account::administrator(email));
            }
            return Err(AuthError::InvalidCredentials);
        }

        let (mut account, password_hash) = self
            .accounts
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        verify_password(password, &password_hash)?;

        account.sign_in_count = self.accounts.record_sign_in(&email).await?;

        Ok(account)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_validation() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
