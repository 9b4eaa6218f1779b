//! Mapping of raw Takeout records to canonical Geory records.
//!
//! Identifiers are always computed over the raw record, never over the
//! canonical output. For visits that need geocoding the raw record is first
//! completed with the resolved address, so the identifier covers the record
//! as it was finally imported.

use async_trait::async_trait;
use chrono::DateTime;
use geory_core::{record_identifier, CanonicalLocation, CanonicalVisit};
use geory_geocode::ReverseGeocode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::TakeoutError;
use crate::merge::RecordMapper;
use crate::types::{PlaceVisit, TakeoutLocation};

/// Takeout coordinates are integer degrees × 10^7.
const E7: f64 = 10_000_000.0;

#[allow(clippy::cast_precision_loss)]
fn from_e7(value: i64) -> f64 {
    value as f64 / E7
}

/// Parses an RFC 3339 timestamp into unix seconds, keeping millisecond
/// fractions.
///
/// # Errors
///
/// Returns [`TakeoutError::Timestamp`] if `value` is not RFC 3339.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<f64, TakeoutError> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|source| TakeoutError::Timestamp {
        field,
        value: value.to_owned(),
        source,
    })?;
    #[allow(clippy::cast_precision_loss)]
    let seconds = parsed.timestamp_millis() as f64 / 1000.0;
    Ok(seconds)
}

/// First candidate that is present and non-empty. An empty address leaves
/// the visit unnamed instead of naming it `""`.
fn first_non_empty<const N: usize>(candidates: [Option<&str>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Maps a raw `Records.json` entry to a [`CanonicalLocation`].
///
/// # Errors
///
/// - [`TakeoutError::Parse`] if the record lacks coordinates or a timestamp.
/// - [`TakeoutError::Timestamp`] if the timestamp is malformed.
pub fn map_location_record(raw: &Value) -> Result<CanonicalLocation, TakeoutError> {
    let location = TakeoutLocation::deserialize(raw).map_err(|source| TakeoutError::Parse {
        context: "location record".to_owned(),
        source,
    })?;

    let timestamp = parse_timestamp("timestamp", &location.timestamp)?;

    Ok(CanonicalLocation::imported(
        record_identifier(raw),
        timestamp,
        from_e7(location.latitude_e7),
        from_e7(location.longitude_e7),
        location.accuracy.unwrap_or(0.0),
    ))
}

/// Maps a raw timeline object to a [`CanonicalVisit`].
///
/// Returns `Ok(None)` when either coordinate is missing; this is common in
/// Takeout data and not an error. When the raw location has no `address` key
/// the place is reverse-geocoded and the resolved `display_name` is written
/// into `raw` (`placeVisit.location.address`) before the identifier is
/// computed. An explicit `"address": null` is kept as is and not geocoded.
///
/// Name precedence: the raw `name`, then the geocoder's place name (only when
/// geocoding happened), then the address. Empty strings count as absent, so
/// a visit whose only candidate is `""` gets no name.
///
/// # Errors
///
/// - [`TakeoutError::InvalidRecord`] if `raw` has no usable `placeVisit`.
/// - [`TakeoutError::Geocode`] if the reverse lookup fails.
/// - [`TakeoutError::Timestamp`] if the duration timestamps are malformed.
pub async fn map_visit_record<G>(
    raw: &mut Value,
    geocoder: &mut G,
) -> Result<Option<CanonicalVisit>, TakeoutError>
where
    G: ReverseGeocode,
{
    let payload = raw
        .get("placeVisit")
        .filter(|v| !v.is_null())
        .ok_or_else(|| TakeoutError::InvalidRecord {
            reason: "not a visit record".to_owned(),
        })?;

    let address_missing = payload.pointer("/location/address").is_none();

    let visit = PlaceVisit::deserialize(payload).map_err(|e| TakeoutError::InvalidRecord {
        reason: format!("malformed placeVisit: {e}"),
    })?;

    let location = visit.location.ok_or_else(|| TakeoutError::InvalidRecord {
        reason: "placeVisit has no location".to_owned(),
    })?;

    let (Some(lat_e7), Some(lng_e7)) = (location.latitude_e7, location.longitude_e7) else {
        tracing::debug!(
            name = location.name.as_deref().unwrap_or_default(),
            "skipping visit without coordinates"
        );
        return Ok(None);
    };

    let latitude = from_e7(lat_e7);
    let longitude = from_e7(lng_e7);

    let mut address = location.address;
    let mut geocoded_name = None;
    if address_missing {
        let result = geocoder.reverse_geocode(latitude, longitude).await?;
        geocoded_name = Some(result.place_name());

        if let Some(display_name) = result.display_name {
            if let Some(raw_location) = raw
                .pointer_mut("/placeVisit/location")
                .and_then(Value::as_object_mut)
            {
                raw_location.insert("address".to_owned(), Value::String(display_name.clone()));
            }
            address = Some(display_name);
        }
    }

    let duration = visit.duration.ok_or_else(|| TakeoutError::InvalidRecord {
        reason: "placeVisit has no duration".to_owned(),
    })?;
    let arrival = parse_timestamp("startTimestamp", &duration.start_timestamp)?;
    let departure = parse_timestamp("endTimestamp", &duration.end_timestamp)?;

    let name = first_non_empty([
        location.name.as_deref(),
        geocoded_name.as_deref(),
        address.as_deref(),
    ]);

    Ok(Some(CanonicalVisit::imported(
        record_identifier(raw),
        latitude,
        longitude,
        address,
        name,
        arrival,
        departure,
    )))
}

/// [`RecordMapper`] for `Records.json` point fixes. Never skips a record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocationMapper;

#[async_trait]
impl RecordMapper for LocationMapper {
    type Output = CanonicalLocation;

    async fn map_record(&mut self, raw: Value) -> Result<Option<CanonicalLocation>, TakeoutError> {
        map_location_record(&raw).map(Some)
    }
}

/// [`RecordMapper`] for semantic place visits, geocoding through `G`.
pub struct VisitMapper<'g, G> {
    geocoder: &'g mut G,
}

impl<'g, G: ReverseGeocode> VisitMapper<'g, G> {
    pub fn new(geocoder: &'g mut G) -> Self {
        Self { geocoder }
    }
}

#[async_trait]
impl<'g, G: ReverseGeocode> RecordMapper for VisitMapper<'g, G> {
    type Output = CanonicalVisit;

    async fn map_record(&mut self, mut raw: Value) -> Result<Option<CanonicalVisit>, TakeoutError> {
        map_visit_record(&mut raw, &mut *self.geocoder).await
    }
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod tests;
