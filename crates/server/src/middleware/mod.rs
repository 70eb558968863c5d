//! HTTP middleware stack for the studio server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalAccount, RequireAccount, RequireAdmin, clear_current_account, set_current_account,
};
pub use session::create_session_layer;
