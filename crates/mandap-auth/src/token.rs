//! JWT issuance and verification.
//!
//! Access and refresh tokens share the same claim structure and signing key;
//! they differ only in their time-to-live. Tokens are self-describing, so the
//! server only tracks the ones revoked before their natural expiry (see
//! [`crate::storage::RevokedTokenStorage`]).
//!
//! ## Example
//!
//! ```ignore
//! use mandap_auth::token::JwtService;
//!
//! let jwt = JwtService::new("a-secret-of-at-least-32-characters!!");
//! let token = jwt.issue(partner_id, std::time::Duration::from_secs(3600))?;
//! let claims = jwt.verify(&token)?;
//! assert_eq!(claims.sub, partner_id);
//! ```

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a token.
    #[error("Failed to decode token: {message}")]
    DecodingError {
        /// Description of the decoding error.
        message: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token signature is invalid.
    #[error("Invalid signature")]
    InvalidSignature,
}

impl JwtError {
    /// Creates a new `EncodingError`.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Creates a new `DecodingError`.
    #[must_use]
    pub fn decoding_error(message: impl Into<String>) -> Self {
        Self::DecodingError {
            message: message.into(),
        }
    }

    /// Returns `true` if the token was structurally valid but past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::decoding_error(err.to_string()),
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claims carried by every Mandap token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Partner id the token was issued to.
    pub sub: Uuid,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// The expiry as an [`OffsetDateTime`].
    ///
    /// Returns `None` only when the `exp` claim is outside the representable
    /// timestamp range.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp).ok()
    }
}

// =============================================================================
// JWT Service
// =============================================================================

/// Issues and verifies HS256-signed tokens with a shared secret.
///
/// The secret comes from process configuration and never appears in the
/// token itself.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Creates a new service from the shared signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues a signed token for `partner_id` expiring after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::EncodingError`] if signing fails.
    pub fn issue(&self, partner_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let now = OffsetDateTime::now_utc();
        let claims = TokenClaims {
            sub: partner_id,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::encoding_error(e.to_string()))
    }

    /// Verifies a token's signature and expiry and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`JwtError::Expired`] once `now >= exp` (no clock leeway)
    /// - [`JwtError::InvalidSignature`] for a token signed with another secret
    /// - [`JwtError::DecodingError`] for anything that is not a JWT
    pub fn verify(&self, token: &str) -> Result<TokenClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::from)
    }
}

// =============================================================================
// Tests
// =============================================================================
