//! Core types for Character Studio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod mode;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use mode::{GenerationMode, GenerationModeError};
pub use role::AccountRole;
