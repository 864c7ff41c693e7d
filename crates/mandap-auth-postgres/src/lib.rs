//! PostgreSQL storage backend for mandap-auth.
//!
//! Provides persistent storage for:
//!
//! - Partner accounts (`partner` table)
//! - Business profiles (`partner_profile` table, one row per partner)
//! - The revocation ledger (`revoked_token` table)
//!
//! The expected table definitions are documented in each module; creating
//! them is left to the deployment (migrations are out of scope for this
//! crate). Uniqueness constraints carry the concurrency guarantees: a
//! duplicate email, a second profile, or a double revocation lose the race
//! at the database and surface as `Conflict`.
//!
//! # Example
//!
//! ```ignore
//! use mandap_auth_postgres::PgPartnerStorage;
//!
//! let partners = PgPartnerStorage::new(pool.clone());
//! let partner = partners.find_by_email("owner@example.com").await?;
//! ```

pub mod partner;
pub mod profile;
pub mod revoked_token;

use mandap_core::AppError;

pub use partner::PgPartnerStorage;
pub use profile::PgProfileStorage;
pub use revoked_token::PgRevokedTokenStorage;

/// PostgreSQL connection pool type alias.
pub type PgPool = sqlx_postgres::PgPool;

/// Maps a driver error to the domain taxonomy.
///
/// The detail stays inside the error for logging; the HTTP boundary hides
/// it from clients.
pub(crate) fn db_error(err: sqlx_core::Error) -> AppError {
    AppError::storage(format!("Database error: {err}"))
}
