//! Character Studio Core - Shared types library.
//!
//! This crate provides common types used across Character Studio components:
//! - `server` - JSON API backend for the studio single-page app
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails, type-safe IDs, account roles,
//!   and generation modes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
