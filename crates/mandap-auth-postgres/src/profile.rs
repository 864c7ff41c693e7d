//! Business profile storage for PostgreSQL.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE partner_profile (
//!     id                UUID PRIMARY KEY,
//!     partner_id        UUID NOT NULL UNIQUE REFERENCES partner(id),
//!     business_name     TEXT NOT NULL DEFAULT '',
//!     owner_name        TEXT NOT NULL DEFAULT '',
//!     email             TEXT NOT NULL DEFAULT '',
//!     phone             TEXT NOT NULL DEFAULT '',
//!     address           TEXT NOT NULL DEFAULT '',
//!     city              TEXT NOT NULL DEFAULT '',
//!     state             TEXT NOT NULL DEFAULT '',
//!     pincode           TEXT NOT NULL DEFAULT '',
//!     business_type     TEXT NOT NULL DEFAULT '',
//!     years_in_business TEXT NOT NULL DEFAULT '',
//!     description       TEXT NOT NULL DEFAULT '',
//!     categories        JSONB NOT NULL DEFAULT '[]',
//!     service_areas     JSONB NOT NULL DEFAULT '[]',
//!     delivery_radius   TEXT NOT NULL DEFAULT '',
//!     created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! The unique index on `partner_id` keeps the profile 1:1 with its partner
//! and lets the update operation run as a single upsert.

use async_trait::async_trait;
use mandap_auth::storage::{NewProfile, Profile, ProfileInput, ProfileStorage};
use mandap_core::{AppError, AppResult};
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_core::types::Json;
use sqlx_postgres::PgRow;
use uuid::Uuid;

use crate::{PgPool, db_error};

const PROFILE_COLUMNS: &str = "id, partner_id, business_name, owner_name, email, phone, \
     address, city, state, pincode, business_type, years_in_business, description, \
     categories, service_areas, delivery_radius, created_at, updated_at";

/// The table is wider than the largest driver tuple, so rows are mapped by
/// column name.
fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx_core::Error> {
    let categories: Json<Vec<String>> = row.try_get("categories")?;
    let service_areas: Json<Vec<String>> = row.try_get("service_areas")?;

    Ok(Profile {
        id: row.try_get("id")?,
        partner_id: row.try_get("partner_id")?,
        business_name: row.try_get("business_name")?,
        owner_name: row.try_get("owner_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        pincode: row.try_get("pincode")?,
        business_type: row.try_get("business_type")?,
        years_in_business: row.try_get("years_in_business")?,
        description: row.try_get("description")?,
        categories: categories.0,
        service_areas: service_areas.0,
        delivery_radius: row.try_get("delivery_radius")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// =============================================================================
// Profile Storage
// =============================================================================

/// Business profile storage operations backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgProfileStorage {
    pool: PgPool,
}

impl PgProfileStorage {
    /// Creates a new profile storage with a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStorage for PgProfileStorage {
    async fn find_by_partner_id(&self, partner_id: Uuid) -> AppResult<Option<Profile>> {
        let row = query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM partner_profile WHERE partner_id = $1"
        ))
        .bind(partner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(|r| profile_from_row(&r)).transpose().map_err(db_error)
    }

    async fn create(&self, profile: NewProfile) -> AppResult<Profile> {
        let row = query(&format!(
            r#"
            INSERT INTO partner_profile (id, partner_id, owner_name, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(profile.partner_id)
        .bind(&profile.owner_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx_core::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return AppError::conflict("Partner already has a profile");
            }
            db_error(e)
        })?;

        profile_from_row(&row).map_err(db_error)
    }

    async fn update(&self, partner_id: Uuid, input: ProfileInput) -> AppResult<Profile> {
        // Single-statement create-or-update; the conflict target is the
        // unique partner_id, so the original id and created_at survive.
        let row = query(&format!(
            r#"
            INSERT INTO partner_profile (
                id, partner_id, business_name, owner_name, email, phone,
                address, city, state, pincode, business_type,
                years_in_business, description, categories, service_areas,
                delivery_radius
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (partner_id) DO UPDATE SET
                business_name = EXCLUDED.business_name,
                owner_name = EXCLUDED.owner_name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                business_type = EXCLUDED.business_type,
                years_in_business = EXCLUDED.years_in_business,
                description = EXCLUDED.description,
                categories = EXCLUDED.categories,
                service_areas = EXCLUDED.service_areas,
                delivery_radius = EXCLUDED.delivery_radius,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(partner_id)
        .bind(&input.business_name)
        .bind(&input.owner_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.pincode)
        .bind(&input.business_type)
        .bind(&input.years_in_business)
        .bind(&input.description)
        .bind(Json(&input.categories))
        .bind(Json(&input.service_areas))
        .bind(&input.delivery_radius)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        profile_from_row(&row).map_err(db_error)
    }
}
