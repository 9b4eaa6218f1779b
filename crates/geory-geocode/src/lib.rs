//! Reverse geocoding for imported visits.
//!
//! [`CachedGeocoder`] answers from the persisted [`GeocodeCache`] when it can
//! and falls back to a rate-limited [`NominatimClient`] lookup otherwise.

pub mod cache;
pub mod client;
pub mod error;
pub mod geocoder;
pub mod types;

pub use cache::{cache_key, GeocodeCache};
pub use client::NominatimClient;
pub use error::GeocodeError;
pub use geocoder::{CachedGeocoder, LookupStats, ReverseGeocode};
pub use types::{GeocodeAddress, GeocodeResult};
