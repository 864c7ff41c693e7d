//! Normalization of raw geocoding records into [`Location`] values.

use crate::model::Location;
use crate::provider::RawPlace;

/// Placeholder used when the provider reports no postal code.
const MISSING_PINCODE: &str = "000000";

/// Normalizes a raw geocoding record into a [`Location`].
///
/// The most specific available place name becomes the `area`: village,
/// town, city, municipality, suburb, neighbourhood, locality, in that
/// order. The city falls back through town, village and municipality to
/// the state district; the district falls back from the state district
/// through city, town and village. A missing postcode maps to the
/// `"000000"` placeholder.
///
/// Returns `None` when the record has no state, no derivable area, or no
/// derivable city/district. Empty strings count as missing.
#[must_use]
pub fn normalize(place: &RawPlace) -> Option<Location> {
    let address = &place.address;

    let area = non_empty(&address.village)
        .or_else(|| non_empty(&address.town))
        .or_else(|| non_empty(&address.city))
        .or_else(|| non_empty(&address.municipality))
        .or_else(|| non_empty(&address.suburb))
        .or_else(|| non_empty(&address.neighbourhood))
        .or_else(|| non_empty(&address.locality))?;

    let state = non_empty(&address.state)?;

    let city = non_empty(&address.city)
        .or_else(|| non_empty(&address.town))
        .or_else(|| non_empty(&address.village))
        .or_else(|| non_empty(&address.municipality))
        .or_else(|| non_empty(&address.state_district))?;

    let district = non_empty(&address.state_district)
        .or_else(|| non_empty(&address.city))
        .or_else(|| non_empty(&address.town))
        .or_else(|| non_empty(&address.village))?;

    let pincode = non_empty(&address.postcode).unwrap_or(MISSING_PINCODE);

    Some(Location {
        pincode: pincode.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        district: district.to_string(),
        area: area.to_string(),
    })
}

/// Treats `None` and the empty string alike.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
