//! HTTP route handlers for the studio server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register         - Register a new account
//! POST /api/auth/login            - Sign in
//! POST /api/auth/logout           - Sign out (session flush)
//! GET  /api/auth/me               - Re-fetch the account and refresh the session snapshot
//!
//! # Generation (requires auth, metered)
//! POST /api/generate              - Generate an image for a prompt and mode
//! POST /api/edit                  - Edit an existing image
//!
//! # Artifacts (requires auth)
//! GET    /api/artifacts           - List own saved artifacts, newest first
//! DELETE /api/artifacts/{id}      - Delete an own artifact
//!
//! # Support messages (requires auth)
//! GET  /api/messages              - Own conversation with the administrator
//! POST /api/messages              - Send a message to the administrator
//!
//! # Site config
//! GET /api/site-config            - SEO metadata (cache-first, public)
//!
//! # Billing
//! GET /billing/return             - Payment provider return URL; credits and redirects
//!
//! # Admin (requires administrator session)
//! GET    /admin/accounts                   - List all accounts
//! PUT    /admin/accounts/{email}/limits    - Update plan tier and legacy maximums
//! POST   /admin/accounts/{email}/credits   - Grant credits
//! DELETE /admin/accounts/{email}           - Delete an account
//! GET    /admin/artifacts                  - List every artifact
//! DELETE /admin/artifacts/{id}             - Delete any artifact
//! GET    /admin/messages                   - Inbox (unique standard senders)
//! GET    /admin/conversations/{email}      - Conversation with one account
//! POST   /admin/messages                   - Reply to an account
//! DELETE /admin/messages/{id}              - Delete a message
//! PUT    /admin/site-config                - Overwrite SEO metadata
//! ```

pub mod admin;
pub mod artifacts;
pub mod auth;
pub mod billing;
pub mod generate;
pub mod messages;
pub mod site;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the authenticated user API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::generate))
        .route("/edit", post(generate::edit))
        .route("/artifacts", get(artifacts::list))
        .route("/artifacts/{id}", delete(artifacts::remove))
        .route("/messages", get(messages::conversation).post(messages::send))
        .route("/site-config", get(site::show))
}

/// Create the administrator router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(admin::list_accounts))
        .route("/accounts/{email}/limits", put(admin::update_limits))
        .route("/accounts/{email}/credits", post(admin::grant_credits))
        .route("/accounts/{email}", delete(admin::delete_account))
        .route("/artifacts", get(admin::list_artifacts))
        .route("/artifacts/{id}", delete(admin::delete_artifact))
        .route("/messages", get(admin::inbox).post(admin::reply))
        .route("/messages/{id}", delete(admin::delete_message))
        .route("/conversations/{email}", get(admin::conversation))
        .route("/site-config", put(admin::update_site_config))
}

/// Create all routes for the studio server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api", api_routes())
        .nest("/admin", admin_routes())
        .route("/billing/return", get(billing::payment_return))
}
