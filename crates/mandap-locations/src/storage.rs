//! Storage contract for the location cache.

use async_trait::async_trait;

use mandap_core::AppResult;

use crate::model::Location;

/// Persistence contract for cached locations.
///
/// The cache is append-only: rows are written by Tier-2 cache fills and
/// never updated. Uniqueness of `(pincode, city, area)` is the storage's
/// responsibility, so concurrent fills of the same place resolve to a
/// single row.
#[async_trait]
pub trait LocationStorage: Send + Sync {
    /// Searches cached locations.
    ///
    /// Matches `query` case-insensitively as a substring of `city`, `area`
    /// and `district`, and case-sensitively as a substring of `pincode`,
    /// returning at most `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<Location>>;

    /// Inserts a location unless a row with the same
    /// `(pincode, city, area)` already exists.
    ///
    /// Returns `true` when a new row was written and `false` when an
    /// existing row was left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn insert_if_absent(&self, location: &Location) -> AppResult<bool>;
}
