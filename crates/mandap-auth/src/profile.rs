//! Partner business profile service.
//!
//! Profiles are created empty at sign-up, so a missing row is an expected
//! state rather than an error: fetching then synthesizes an empty payload
//! from the partner account, and updating creates the row on the fly.

use std::sync::Arc;

use mandap_core::{AppError, AppResult};
use serde::Serialize;
use uuid::Uuid;

use crate::storage::{Partner, PartnerStorage, Profile, ProfileInput, ProfileStorage};

// =============================================================================
// Types
// =============================================================================

/// Profile payload handed back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
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
    pub categories: Vec<String>,
    pub service_areas: Vec<String>,
    pub delivery_radius: String,
}

impl ProfileData {
    fn from_profile(profile: Profile) -> Self {
        Self {
            business_name: profile.business_name,
            owner_name: profile.owner_name,
            email: profile.email,
            phone: profile.phone,
            address: profile.address,
            city: profile.city,
            state: profile.state,
            pincode: profile.pincode,
            business_type: profile.business_type,
            years_in_business: profile.years_in_business,
            description: profile.description,
            categories: profile.categories,
            service_areas: profile.service_areas,
            delivery_radius: profile.delivery_radius,
        }
    }

    /// Payload for a partner with no stored profile: contact details from
    /// the account, everything else empty.
    fn empty_for(partner: &Partner) -> Self {
        Self {
            business_name: String::new(),
            owner_name: partner.full_name(),
            email: partner.email.clone(),
            phone: partner.phone.clone(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            business_type: String::new(),
            years_in_business: String::new(),
            description: String::new(),
            categories: Vec::new(),
            service_areas: Vec::new(),
            delivery_radius: String::new(),
        }
    }
}

/// Outcome of a profile fetch: the message differs depending on whether a
/// stored profile existed.
#[derive(Debug, Clone)]
pub struct ProfileFetch {
    pub message: &'static str,
    pub profile: ProfileData,
}

// =============================================================================
// Profile Service
// =============================================================================

/// Reads and writes the 1:1 partner business profile.
pub struct ProfileService {
    partners: Arc<dyn PartnerStorage>,
    profiles: Arc<dyn ProfileStorage>,
}

impl ProfileService {
    /// Creates a new profile service.
    #[must_use]
    pub fn new(partners: Arc<dyn PartnerStorage>, profiles: Arc<dyn ProfileStorage>) -> Self {
        Self { partners, profiles }
    }

    /// Fetches the partner's profile.
    ///
    /// A partner without a stored profile gets a synthesized empty payload
    /// and the message "Profile not found" instead of an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the partner itself does not exist.
    pub async fn get_profile(&self, partner_id: Uuid) -> AppResult<ProfileFetch> {
        let partner = self
            .partners
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Partner", partner_id.to_string()))?;

        match self.profiles.find_by_partner_id(partner_id).await? {
            Some(profile) => Ok(ProfileFetch {
                message: "Profile fetched successfully",
                profile: ProfileData::from_profile(profile),
            }),
            None => Ok(ProfileFetch {
                message: "Profile not found",
                profile: ProfileData::empty_for(&partner),
            }),
        }
    }

    /// Creates or updates the partner's profile from the typed input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the partner does not exist.
    pub async fn update_profile(
        &self,
        partner_id: Uuid,
        input: ProfileInput,
    ) -> AppResult<ProfileData> {
        if self.partners.find_by_id(partner_id).await?.is_none() {
            return Err(AppError::not_found("Partner", partner_id.to_string()));
        }

        let profile = self.profiles.update(partner_id, input).await?;
        tracing::debug!(partner_id = %partner_id, "Profile updated");

        Ok(ProfileData::from_profile(profile))
    }
}

// =============================================================================
// Tests
// =============================================================================
