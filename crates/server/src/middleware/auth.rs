//! Authentication extractors.
//!
//! Extractors pull the signed-in account snapshot out of the session. This
//! is a JSON API, so rejections are JSON status responses rather than
//! redirects.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAccount, session_keys};

/// Extractor that requires a signed-in account.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAccount(account): RequireAccount,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", account.display_name)
/// }
/// ```
pub struct RequireAccount(pub CurrentAccount);

/// Extractor that requires a signed-in administrator.
///
/// Rejects with 401 when nobody is signed in and 403 when a standard
/// account tries an administrator surface.
pub struct RequireAdmin(pub CurrentAccount);

/// Rejection for the authentication extractors.
pub enum AuthRejection {
    /// Not signed in.
    Unauthorized,
    /// Signed in but not an administrator.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Sign in required" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Administrator access required" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let account: CurrentAccount = session
            .get(session_keys::CURRENT_ACCOUNT)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(account))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAccount(account) = RequireAccount::from_request_parts(parts, state).await?;

        if !account.is_administrator() {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(account))
    }
}

/// Extractor that optionally gets the signed-in account.
///
/// Unlike `RequireAccount`, this does not reject the request when nobody is
/// signed in.
pub struct OptionalAccount(pub Option<CurrentAccount>);

impl<S> FromRequestParts<S> for OptionalAccount
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(account))
    }
}

/// Helper to write the account snapshot into the session.
///
/// Called at sign-in and after every quota mutation that patched the
/// snapshot.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_account(
    session: &Session,
    account: &CurrentAccount,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_ACCOUNT, account)
        .await
}

/// Helper to clear the account snapshot from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_account(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAccount>(session_keys::CURRENT_ACCOUNT)
        .await?;
    Ok(())
}
