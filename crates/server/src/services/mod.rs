//! Business logic services.
//!
//! Services wrap the repository layer with the domain rules: credential
//! checks and account creation in [`auth`], credit admission and accounting
//! in [`quota`].

pub mod auth;
pub mod quota;

pub use auth::{AuthError, AuthService};
pub use quota::QuotaService;
