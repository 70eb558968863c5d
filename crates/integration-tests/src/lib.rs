//! Integration tests for Character Studio.
//!
//! Every test in `tests/` needs a live `PostgreSQL` database and is
//! `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a throwaway database
//! export STUDIO_DATABASE_URL=postgres://localhost/studio_test
//!
//! # Run the database-backed tests
//! cargo test -p character-studio-integration-tests -- --ignored
//! ```
//!
//! Migrations are applied on connection, and every test works under a
//! freshly generated account email, so the suite can run repeatedly against
//! the same database without cleanup.
