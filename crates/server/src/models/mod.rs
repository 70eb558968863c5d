//! Domain models for the studio server.
//!
//! These types represent validated domain objects separate from database row
//! types. Conversions from rows live in the repository layer.

pub mod account;
pub mod artifact;
pub mod message;
pub mod session;
pub mod site_config;

pub use account::{Account, ActivityKind, LegacyQuota};
pub use artifact::SavedArtifact;
pub use message::SupportMessage;
pub use session::{CurrentAccount, keys as session_keys};
pub use site_config::SiteConfig;
