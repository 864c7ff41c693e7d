//! Partner account storage trait.
//!
//! The credential store: persists partner identity and password hash, looked
//! up by id or email. Email uniqueness is enforced by the backing store;
//! comparisons are case-sensitive as stored.

use async_trait::async_trait;
use mandap_core::AppResult;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Types
// =============================================================================

/// A registered partner account.
#[derive(Debug, Clone)]
pub struct Partner {
    /// Opaque account id.
    pub id: Uuid,
    /// Unique sign-in email.
    pub email: String,
    /// Argon2 PHC hash of the password. Never serialized.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub created_at: OffsetDateTime,
}

impl Partner {
    /// Full name as shown on the synthesized profile.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Data required to create a partner account.
#[derive(Debug, Clone)]
pub struct NewPartner {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

// =============================================================================
// Storage Trait
// =============================================================================

/// Storage trait for partner accounts.
#[async_trait]
pub trait PartnerStorage: Send + Sync {
    /// Looks up a partner by exact email.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Partner>>;

    /// Looks up a partner by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>>;

    /// Creates a partner account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` (field `email`) when the email is already
    /// registered, or a storage error if the insert fails.
    async fn create(&self, partner: NewPartner) -> AppResult<Partner>;
}
