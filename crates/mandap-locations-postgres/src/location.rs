//! Location cache storage for PostgreSQL.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE location (
//!     id       UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     pincode  TEXT NOT NULL,
//!     city     TEXT NOT NULL,
//!     state    TEXT NOT NULL,
//!     district TEXT NOT NULL,
//!     area     TEXT NOT NULL,
//!     UNIQUE (pincode, city, area)
//! );
//! CREATE INDEX idx_location_city ON location (city);
//! CREATE INDEX idx_location_pincode ON location (pincode);
//! CREATE INDEX idx_location_area ON location (area);
//! ```
//!
//! The unique key on `(pincode, city, area)` makes cache fills
//! race-free: `ON CONFLICT DO NOTHING` lets the first writer win and
//! everyone else skip.

use async_trait::async_trait;
use mandap_core::AppResult;
use mandap_locations::{Location, LocationStorage};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;

use crate::{PgPool, db_error};

/// Columns of the `location` table in select order.
type LocationRow = (String, String, String, String, String);

fn location_from_row(row: LocationRow) -> Location {
    Location {
        pincode: row.0,
        city: row.1,
        state: row.2,
        district: row.3,
        area: row.4,
    }
}

// =============================================================================
// Location Storage
// =============================================================================

/// Location cache operations backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgLocationStorage {
    pool: PgPool,
}

impl PgLocationStorage {
    /// Creates a new location storage with a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStorage for PgLocationStorage {
    async fn search(&self, query_text: &str, limit: usize) -> AppResult<Vec<Location>> {
        let pattern = format!("%{query_text}%");

        let rows: Vec<LocationRow> = query_as(
            r#"
            SELECT pincode, city, state, district, area
            FROM location
            WHERE city ILIKE $1
               OR area ILIKE $1
               OR pincode LIKE $1
               OR district ILIKE $1
            LIMIT $2
            "#,
        )
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(location_from_row).collect())
    }

    async fn insert_if_absent(&self, location: &Location) -> AppResult<bool> {
        let result = query(
            r#"
            INSERT INTO location (pincode, city, state, district, area)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (pincode, city, area) DO NOTHING
            "#,
        )
        .bind(&location.pincode)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.district)
        .bind(&location.area)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            tracing::debug!(
                "Cached location {} / {} / {}",
                location.pincode,
                location.city,
                location.area
            );
        }

        Ok(inserted)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    #[test]
    fn test_storage_creation() {
        // This is a compile-time test to ensure the storage can be created
        // Actual database tests would require a test database connection
    }
}
