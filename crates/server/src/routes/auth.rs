//! Authentication route handlers.
//!
//! All handlers speak JSON; the session snapshot is the only server-side
//! login state.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::accounts::AccountRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAccount, clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub marketing_agreed: bool,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new account and sign it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<CurrentAccount>> {
    let auth = AuthService::new(state.pool(), &state.config().admin);
    let account = auth
        .register(
            &request.email,
            &request.password,
            &request.display_name,
            request.marketing_agreed,
        )
        .await?;

    start_session(&session, account.into()).await
}

/// Sign in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAccount>> {
    let auth = AuthService::new(state.pool(), &state.config().admin);
    let account = auth.login(&request.email, &request.password).await?;

    start_session(&session, account.into()).await
}

/// Sign out: drop the snapshot and flush the session.
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_account(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Re-fetch the account from the store and refresh the session snapshot.
///
/// This is the reconciliation point for the optimistic session updates: the
/// snapshot is replaced wholesale with what the store says. Administrators
/// have no stored row and get their current snapshot back unchanged.
pub async fn me(
    State(state): State<AppState>,
    session: Session,
    RequireAccount(account): RequireAccount,
) -> Result<Json<CurrentAccount>> {
    if account.is_administrator() {
        return Ok(Json(account));
    }

    let fresh = AccountRepository::new(state.pool())
        .get(&account.email)
        .await?;

    let Some(fresh) = fresh else {
        // Row deleted underneath the session (admin removal); end the login.
        clear_current_account(&session)
            .await
            .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
        return Err(AppError::Unauthorized("account no longer exists".into()));
    };

    let snapshot = CurrentAccount::from(fresh);
    set_current_account(&session, &snapshot)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(Json(snapshot))
}

async fn start_session(
    session: &Session,
    snapshot: CurrentAccount,
) -> Result<Json<CurrentAccount>> {
    set_current_account(session, &snapshot)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(snapshot.email.as_ref());

    Ok(Json(snapshot))
}
