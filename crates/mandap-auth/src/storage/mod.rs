//! Storage traits for authentication data.
//!
//! This module defines storage interfaces for:
//!
//! - Partner accounts (credential store)
//! - Business profiles (one per partner)
//! - Revoked bearer tokens (the revocation ledger)
//!
//! # Implementations
//!
//! Storage implementations are provided in separate crates:
//!
//! - `mandap-auth-postgres` - PostgreSQL storage backend

pub mod partner;
pub mod profile;
pub mod revoked_token;

pub use partner::{NewPartner, Partner, PartnerStorage};
pub use profile::{NewProfile, Profile, ProfileInput, ProfileStorage};
pub use revoked_token::RevokedTokenStorage;
