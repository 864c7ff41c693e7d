//! The normalized location record served to callers and stored in the cache.

use serde::{Deserialize, Serialize};

/// A normalized location.
///
/// Rows come either from a Tier-1 cache lookup or from normalizing a raw
/// geocoding result. The cache treats `(pincode, city, area)` as the
/// identity of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Postal code, or `"000000"` when the provider reported none.
    pub pincode: String,
    /// City-level name.
    pub city: String,
    /// State-level name.
    pub state: String,
    /// District-level name.
    pub district: String,
    /// The most specific place name (village, suburb, locality, ...).
    pub area: String,
}
