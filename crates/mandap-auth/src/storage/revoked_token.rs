//! Revoked token storage trait (the revocation ledger).
//!
//! Tokens are stateless JWTs, so sign-out cannot destroy them; instead the
//! raw token string is recorded here until it would have expired anyway.
//! Only revoked-but-unexpired tokens need tracking, which bounds the ledger
//! to the access-token TTL window.
//!
//! # Implementation Notes
//!
//! - A token string appears at most once; a second `revoke` of the same
//!   token is a conflict, not an upsert.
//! - `is_revoked` must treat logically expired entries as absent without
//!   deleting them; physical deletion happens only via `cleanup_expired`.
//! - Lookups sit on the hot path of every authenticated request.

use async_trait::async_trait;
use mandap_core::AppResult;
use time::OffsetDateTime;

/// Storage trait for the revocation ledger.
#[async_trait]
pub trait RevokedTokenStorage: Send + Sync {
    /// Records a token as revoked.
    ///
    /// `expires_at` is the token's original expiry; once it passes, the
    /// entry is dead weight and [`cleanup_expired`](Self::cleanup_expired)
    /// may delete it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` when the token is already in the ledger,
    /// or a storage error if the insert fails.
    async fn revoke(&self, token: &str, expires_at: OffsetDateTime) -> AppResult<()>;

    /// Returns `true` iff the token is in the ledger and not yet expired.
    ///
    /// Expired entries are reported as not revoked (the token is rejected on
    /// expiry grounds before this check is ever consulted) but are left in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn is_revoked(&self, token: &str) -> AppResult<bool>;

    /// Deletes ledger entries whose `expires_at` has passed.
    ///
    /// Invoked by operators or an external scheduler; the services spawn no
    /// background tasks of their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    ///
    /// # Returns
    ///
    /// The number of entries deleted.
    async fn cleanup_expired(&self) -> AppResult<u64>;
}
