//! # mandap-locations
//!
//! Location search for the Mandap marketplace backend.
//!
//! Search runs in two tiers: a database-backed location cache answers
//! first, and only a complete miss falls through to an external geocoding
//! provider, whose normalized results are persisted so the next lookup is
//! served locally. Provider failures degrade to an empty result instead of
//! surfacing to callers.
//!
//! ## Modules
//!
//! - [`model`] - The normalized [`Location`] record
//! - [`storage`] - Cache contract (implemented in `mandap-locations-postgres`)
//! - [`provider`] - Geocoding contract and the Nominatim client
//! - [`normalize`] - Raw provider records into [`Location`] values
//! - [`service`] - `LocationService`, the tiered search engine

pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod storage;

pub use model::Location;
pub use normalize::normalize;
pub use provider::{
    GeocodeError, GeocodeProvider, GeocodingConfig, NominatimClient, PlaceAddress, RawPlace,
};
pub use service::{LocationService, SearchConfig, SearchOutcome};
pub use storage::LocationStorage;
