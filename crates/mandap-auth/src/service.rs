//! Partner sign-up, sign-in, and sign-out.
//!
//! `AuthService` composes the credential store, the token service, and the
//! revocation ledger. Tokens are stateless bearer credentials: there is no
//! session table, and sign-out works by recording the raw token in the
//! ledger until its natural expiry.

use std::sync::Arc;

use mandap_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::password::{hash_password, verify_password};
use crate::storage::{
    NewPartner, NewProfile, Partner, PartnerStorage, ProfileStorage, RevokedTokenStorage,
};
use crate::token::{JwtError, JwtService};

/// Sign-in failures collapse to this one message so that unknown emails and
/// wrong passwords are indistinguishable to a caller.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// =============================================================================
// Request / Response Types
// =============================================================================

/// Sign-up payload, deserialized straight from the HTTP body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// Omitted on the wire counts as "not agreed".
    #[serde(default)]
    pub agree_to_terms: bool,
}

/// Sign-in payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Partner account data safe to hand back to the client.
///
/// Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerData {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl From<&Partner> for PartnerData {
    fn from(partner: &Partner) -> Self {
        Self {
            id: partner.id,
            email: partner.email.clone(),
            first_name: partner.first_name.clone(),
            last_name: partner.last_name.clone(),
            phone: partner.phone.clone(),
        }
    }
}

/// A freshly issued pair of tokens plus the sanitized account data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: PartnerData,
    pub token: String,
    pub refresh_token: String,
}

// =============================================================================
// Auth Service
// =============================================================================

/// Orchestrates partner authentication.
pub struct AuthService {
    partners: Arc<dyn PartnerStorage>,
    profiles: Arc<dyn ProfileStorage>,
    revoked_tokens: Arc<dyn RevokedTokenStorage>,
    jwt: Arc<JwtService>,
    config: AuthConfig,
}

impl AuthService {
    /// Creates a new auth service.
    ///
    /// # Arguments
    ///
    /// * `partners` - Credential store
    /// * `profiles` - Profile storage (for the empty profile at sign-up)
    /// * `revoked_tokens` - Revocation ledger
    /// * `jwt` - Token service (shared with the bearer guard)
    /// * `config` - Token TTLs and sign-up policy
    #[must_use]
    pub fn new(
        partners: Arc<dyn PartnerStorage>,
        profiles: Arc<dyn ProfileStorage>,
        revoked_tokens: Arc<dyn RevokedTokenStorage>,
        jwt: Arc<JwtService>,
        config: AuthConfig,
    ) -> Self {
        Self {
            partners,
            profiles,
            revoked_tokens,
            jwt,
            config,
        }
    }

    /// Registers a new partner and signs them in.
    ///
    /// Policy checks run in a fixed order: terms agreement, password
    /// confirmation, password length, then email uniqueness. The first
    /// failure wins.
    ///
    /// # Errors
    ///
    /// - `AppError::Validation` for a policy violation
    /// - `AppError::Conflict` (field `email`) for a duplicate email
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<AuthSession> {
        // 1. Policy gates, cheapest first.
        if !input.agree_to_terms {
            return Err(AppError::validation(
                "You must agree to terms and conditions",
            ));
        }
        if input.password != input.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }
        if input.password.chars().count() < self.config.min_password_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        // 2. Email uniqueness. The storage unique constraint backstops a
        //    concurrent registration of the same address.
        if self.partners.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict_field("Email already exists", "email"));
        }

        // 3. Hash the password. Argon2 is deliberately slow.
        let password_hash = hash_password(&input.password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

        // 4. Create the account and its empty profile.
        let partner = self
            .partners
            .create(NewPartner {
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
            })
            .await?;

        self.profiles
            .create(NewProfile {
                partner_id: partner.id,
                owner_name: partner.full_name(),
                email: partner.email.clone(),
                phone: partner.phone.clone(),
            })
            .await?;

        tracing::info!(partner_id = %partner.id, "Partner registered");

        // 5. Sign the new partner in immediately.
        self.issue_session(&partner, false)
    }

    /// Signs a partner in with email and password.
    ///
    /// `remember_me` scales the access token TTL by the configured
    /// multiplier; the refresh token TTL is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` with a single generic message for
    /// both an unknown email and a wrong password.
    pub async fn sign_in(&self, input: SignInInput) -> AppResult<AuthSession> {
        // 1. Look up the account. An unknown email and a bad password must
        //    be indistinguishable, so both fall through to the same error.
        let Some(partner) = self.partners.find_by_email(&input.email).await? else {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        // 2. Check the password. A hash that fails to parse is treated as a
        //    mismatch rather than leaking storage state.
        if !verify_password(&input.password, &partner.password_hash).unwrap_or(false) {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        tracing::debug!(partner_id = %partner.id, remember_me = input.remember_me, "Partner signed in");

        // 3. Issue the token pair.
        self.issue_session(&partner, input.remember_me)
    }

    /// Signs a partner out by revoking the presented token.
    ///
    /// The ledger entry keeps the token's own expiry so `cleanup_expired`
    /// can drop it once it would have died anyway. The bearer guard rejects
    /// already-revoked tokens before this routine runs.
    ///
    /// # Errors
    ///
    /// - `AppError::Unauthorized` ("Token has expired" / "Invalid token")
    ///   when the token cannot be revoked meaningfully
    /// - `AppError::Conflict` if the token is already in the ledger
    pub async fn sign_out(&self, token: &str) -> AppResult<()> {
        // 1. Decode for the original expiry; revocation is per-token.
        let claims = self.jwt.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Sign-out with unusable token");
            match e {
                JwtError::Expired => AppError::unauthorized("Token has expired"),
                _ => AppError::unauthorized("Invalid token"),
            }
        })?;

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

        // 2. Record the raw token in the ledger.
        self.revoked_tokens.revoke(token, expires_at).await?;

        tracing::info!(partner_id = %claims.sub, "Partner signed out");

        Ok(())
    }

    fn issue_session(&self, partner: &Partner, remember_me: bool) -> AppResult<AuthSession> {
        let access_ttl = if remember_me {
            self.config.access_token_ttl * self.config.remember_me_multiplier
        } else {
            self.config.access_token_ttl
        };

        let token = self
            .jwt
            .issue(partner.id, access_ttl)
            .map_err(|e| AppError::internal(format!("Failed to issue access token: {e}")))?;
        let refresh_token = self
            .jwt
            .issue(partner.id, self.config.refresh_token_ttl)
            .map_err(|e| AppError::internal(format!("Failed to issue refresh token: {e}")))?;

        Ok(AuthSession {
            user: PartnerData::from(partner),
            token,
            refresh_token,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
