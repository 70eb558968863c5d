//! Payment provider return handler.
//!
//! The payment flow happens entirely off-site; the provider bounces the
//! browser back to `/billing/return?payment_success=true&credits=N`. The
//! handler credits the signed-in account once and redirects to `/` with the
//! marker stripped, which is the only replay guard (best-effort, accepted).

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::{OptionalAccount, set_current_account};
use crate::services::QuotaService;
use crate::state::AppState;

/// Credits granted when the provider does not say how many were bought.
pub const DEFAULT_TOPUP_CREDITS: i64 = 10;

/// Query parameters appended by the payment provider.
#[derive(Debug, Deserialize)]
pub struct PaymentReturnQuery {
    #[serde(default)]
    pub payment_success: Option<String>,
    #[serde(default)]
    pub credits: Option<i64>,
}

/// Handle the payment provider return.
///
/// Unauthenticated hits and unmarked hits redirect without crediting.
/// A store failure here is logged rather than surfaced: the redirect must
/// strip the marker either way, and the grant is reconciled manually.
pub async fn payment_return(
    State(state): State<AppState>,
    session: Session,
    OptionalAccount(account): OptionalAccount,
    Query(query): Query<PaymentReturnQuery>,
) -> Redirect {
    let success = query.payment_success.as_deref() == Some("true");

    let Some(mut account) = account else {
        return Redirect::to("/");
    };

    // Administrators have no stored row to credit.
    if !success || account.is_administrator() {
        return Redirect::to("/");
    }

    let amount = query
        .credits
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_TOPUP_CREDITS);

    let quota = QuotaService::new(state.pool());
    let email = account.email.clone();
    match quota.credit(&email, amount, Some(&mut account)).await {
        Ok(_) => {
            if let Err(e) = set_current_account(&session, &account).await {
                tracing::warn!(account = %account.email, error = %e, "session snapshot update failed");
            }
        }
        Err(e) => {
            tracing::error!(account = %account.email, error = %e, "payment return credit failed");
        }
    }

    Redirect::to("/")
}
