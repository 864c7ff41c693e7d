//! Business profile storage trait.
//!
//! Each partner has at most one profile (unique foreign key). An empty
//! profile is created at sign-up; the update operation is an idempotent
//! create-or-update so a missing row never blocks a partner from filling in
//! their business details.

use async_trait::async_trait;
use mandap_core::AppResult;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Types
// =============================================================================

/// A partner's business profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    /// Owning partner; at most one profile per partner.
    pub partner_id: Uuid,
    pub business_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub business_type: String,
    pub years_in_business: String,
    pub description: String,
    /// Ordered list of offered rental categories.
    pub categories: Vec<String>,
    /// Ordered list of served areas.
    pub service_areas: Vec<String>,
    pub delivery_radius: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for the empty profile created at sign-up.
///
/// Business fields start empty; contact details are copied from the partner
/// account.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub partner_id: Uuid,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
}

/// Typed update payload for a profile.
///
/// Deserialized straight from the HTTP body (camelCase). `description` is
/// the only optional field and defaults to empty; everything else, the
/// category and service-area lists included, is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub business_name: String,
    pub owner_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub business_type: String,
    pub years_in_business: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<String>,
    pub service_areas: Vec<String>,
    pub delivery_radius: String,
}

// =============================================================================
// Storage Trait
// =============================================================================

/// Storage trait for business profiles.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Looks up the profile owned by `partner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_partner_id(&self, partner_id: Uuid) -> AppResult<Option<Profile>>;

    /// Creates the initial (empty) profile for a partner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` when the partner already has a profile,
    /// or a storage error if the insert fails.
    async fn create(&self, profile: NewProfile) -> AppResult<Profile>;

    /// Replaces the partner's profile with `input`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn update(&self, partner_id: Uuid, input: ProfileInput) -> AppResult<Profile>;
}
