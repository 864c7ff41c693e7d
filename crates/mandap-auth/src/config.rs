//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for token issuance and sign-up policy.
///
/// Built once at startup and passed into [`crate::AuthService`]; there are
/// no ambient configuration lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HS256 signing secret. Required (>= 32 characters) in
    /// production; generated per process in development.
    pub jwt_secret: String,

    /// Access token lifetime for a plain sign-in.
    #[serde(with = "humantime_serde")]
    pub access_token_ttl: Duration,

    /// Refresh token lifetime. Never scaled by remember-me.
    #[serde(with = "humantime_serde")]
    pub refresh_token_ttl: Duration,

    /// Minimum accepted password length at sign-up.
    pub min_password_length: usize,

    /// Factor applied to the access token TTL when a partner signs in with
    /// remember-me.
    pub remember_me_multiplier: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl: Duration::from_secs(24 * 3600), // 24 hours
            refresh_token_ttl: Duration::from_secs(720 * 3600), // 30 days
            min_password_length: 8,
            remember_me_multiplier: 24,
        }
    }
}

impl AuthConfig {
    /// Sets the signing secret.
    #[must_use]
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    /// Sets the access token TTL.
    #[must_use]
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Sets the refresh token TTL.
    #[must_use]
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    /// Sets the minimum password length.
    #[must_use]
    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    /// Sets the remember-me multiplier.
    #[must_use]
    pub fn with_remember_me_multiplier(mut self, multiplier: u32) -> Self {
        self.remember_me_multiplier = multiplier;
        self
    }
}
