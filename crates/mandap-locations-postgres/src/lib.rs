//! PostgreSQL storage backend for the location cache.
//!
//! Provides the `location` table behind
//! [`LocationStorage`](mandap_locations::LocationStorage). The expected
//! table definition is documented in [`location`]; creating it is left to
//! the deployment (migrations are out of scope for this crate). The unique
//! key on `(pincode, city, area)` carries the dedup guarantee: concurrent
//! cache fills of the same place resolve to a single row at the database.
//!
//! # Example
//!
//! ```ignore
//! use mandap_locations_postgres::PgLocationStorage;
//!
//! let locations = PgLocationStorage::new(pool.clone());
//! let rows = locations.search("Hebbal", 20).await?;
//! ```

pub mod location;

use mandap_core::AppError;

pub use location::PgLocationStorage;

/// PostgreSQL connection pool type alias.
pub type PgPool = sqlx_postgres::PgPool;

/// Maps a driver error to the domain taxonomy.
pub(crate) fn db_error(err: sqlx_core::Error) -> AppError {
    AppError::storage(format!("Database error: {err}"))
}
