//! # mandap-auth
//!
//! Partner authentication for the Mandap marketplace backend.
//!
//! This crate provides:
//! - JWT issuance and verification (HS256, shared secret)
//! - Argon2id password hashing
//! - The sign-up / sign-in / sign-out orchestration
//! - Business profile fetch and update
//! - A bearer-token guard for protected routes
//!
//! ## Modules
//!
//! - [`config`] - Token TTLs and sign-up policy
//! - [`token`] - JWT encode/decode
//! - [`password`] - Password hashing and secret generation
//! - [`storage`] - Storage traits (implemented in `mandap-auth-postgres`)
//! - [`service`] - `AuthService`
//! - [`profile`] - `ProfileService`
//! - [`middleware`] - `BearerAuth` extractor

pub mod config;
pub mod middleware;
pub mod password;
pub mod profile;
pub mod service;
pub mod storage;
pub mod token;

pub use config::AuthConfig;
pub use middleware::{AuthContext, AuthRejection, AuthState, BearerAuth};
pub use profile::{ProfileData, ProfileFetch, ProfileService};
pub use service::{AuthService, AuthSession, PartnerData, SignInInput, SignUpInput};
pub use storage::{
    NewPartner, NewProfile, Partner, PartnerStorage, Profile, ProfileInput, ProfileStorage,
    RevokedTokenStorage,
};
pub use token::{JwtError, JwtService, TokenClaims};
