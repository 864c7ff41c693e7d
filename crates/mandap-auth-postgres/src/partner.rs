//! Partner account storage for PostgreSQL.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE partner (
//!     id            UUID PRIMARY KEY,
//!     email         TEXT NOT NULL UNIQUE,
//!     password_hash TEXT NOT NULL,
//!     first_name    TEXT NOT NULL,
//!     last_name     TEXT NOT NULL,
//!     phone         TEXT NOT NULL,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! The unique index on `email` decides concurrent sign-ups of the same
//! address; the loser surfaces as `Conflict`.

use async_trait::async_trait;
use mandap_auth::storage::{NewPartner, Partner, PartnerStorage};
use mandap_core::{AppError, AppResult};
use sqlx_core::query_as::query_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{PgPool, db_error};

/// Columns of the `partner` table in select order.
type PartnerRow = (Uuid, String, String, String, String, String, OffsetDateTime);

fn partner_from_row(row: PartnerRow) -> Partner {
    Partner {
        id: row.0,
        email: row.1,
        password_hash: row.2,
        first_name: row.3,
        last_name: row.4,
        phone: row.5,
        created_at: row.6,
    }
}

// =============================================================================
// Partner Storage
// =============================================================================

/// Partner account storage operations backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgPartnerStorage {
    pool: PgPool,
}

impl PgPartnerStorage {
    /// Creates a new partner storage with a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerStorage for PgPartnerStorage {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Partner>> {
        let row: Option<PartnerRow> = query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, created_at
            FROM partner
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(partner_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>> {
        let row: Option<PartnerRow> = query_as(
            r#"
            SELECT id, email, password_hash, first_name, last_name, phone, created_at
            FROM partner
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(partner_from_row))
    }

    async fn create(&self, partner: NewPartner) -> AppResult<Partner> {
        let row: PartnerRow = query_as(
            r#"
            INSERT INTO partner (id, email, password_hash, first_name, last_name, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, email, password_hash, first_name, last_name, phone, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&partner.email)
        .bind(&partner.password_hash)
        .bind(&partner.first_name)
        .bind(&partner.last_name)
        .bind(&partner.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return AppError::conflict_field("Email already exists", "email");
            }
            db_error(e)
        })?;

        Ok(partner_from_row(row))
    }
}
