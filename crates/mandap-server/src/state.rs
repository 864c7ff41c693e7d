//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use mandap_auth::storage::{PartnerStorage, ProfileStorage, RevokedTokenStorage};
use mandap_auth::{AuthService, AuthState, JwtService, ProfileService};
use mandap_auth_postgres::{PgPartnerStorage, PgProfileStorage, PgRevokedTokenStorage};
use mandap_locations::{GeocodeProvider, LocationService, LocationStorage, NominatimClient};
use mandap_locations_postgres::PgLocationStorage;
use sqlx_postgres::PgPool;

use crate::config::AppConfig;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    /// Kept for the `/health` probe; the services hold their own handles.
    pub pool: PgPool,
    pub auth: Arc<AuthService>,
    pub profiles: Arc<ProfileService>,
    pub locations: Arc<LocationService>,
    auth_state: AuthState,
}

impl AppState {
    /// Wires the PostgreSQL storages and the Nominatim client into the
    /// service layer.
    #[must_use]
    pub fn new(config: &AppConfig, pool: PgPool) -> Self {
        let partners: Arc<dyn PartnerStorage> = Arc::new(PgPartnerStorage::new(pool.clone()));
        let profiles: Arc<dyn ProfileStorage> = Arc::new(PgProfileStorage::new(pool.clone()));
        let revoked_tokens: Arc<dyn RevokedTokenStorage> =
            Arc::new(PgRevokedTokenStorage::new(pool.clone()));
        let locations: Arc<dyn LocationStorage> = Arc::new(PgLocationStorage::new(pool.clone()));
        let provider: Arc<dyn GeocodeProvider> =
            Arc::new(NominatimClient::new(config.geocoding.clone()));

        Self::from_parts(
            config,
            pool,
            partners,
            profiles,
            revoked_tokens,
            locations,
            provider,
        )
    }

    /// Builds the state from explicit storage and provider implementations.
    ///
    /// Router tests inject in-memory mocks through this constructor.
    #[must_use]
    pub fn from_parts(
        config: &AppConfig,
        pool: PgPool,
        partners: Arc<dyn PartnerStorage>,
        profiles: Arc<dyn ProfileStorage>,
        revoked_tokens: Arc<dyn RevokedTokenStorage>,
        locations: Arc<dyn LocationStorage>,
        provider: Arc<dyn GeocodeProvider>,
    ) -> Self {
        let jwt = Arc::new(JwtService::new(&config.auth.jwt_secret));
        let auth_state = AuthState::new(jwt.clone(), revoked_tokens.clone());

        let auth = Arc::new(AuthService::new(
            partners.clone(),
            profiles.clone(),
            revoked_tokens,
            jwt,
            config.auth.clone(),
        ));
        let profile_service = Arc::new(ProfileService::new(partners, profiles));
        let location_service = Arc::new(LocationService::new(
            locations,
            provider,
            config.search.clone(),
        ));

        Self {
            pool,
            auth,
            profiles: profile_service,
            locations: location_service,
            auth_state,
        }
    }
}

/// Lets the bearer guard pull its state out of the application state.
impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth_state.clone()
    }
}
