//! Google Takeout "Location History (Timeline)" record types.
//!
//! These are typed *views* over raw JSON values. The raw value itself is what
//! gets hashed into an identifier, so mappers deserialize from a borrowed
//! `serde_json::Value` and never re-serialize these structs.
//!
//! ## Observed shape
//!
//! ### `Records.json`
//! `{ "locations": [ ... ] }`. Each entry carries `latitudeE7` / `longitudeE7`
//! (degrees × 10^7 as integers), `accuracy` in metres and an RFC 3339
//! `timestamp`. Most entries also carry `source`, `deviceTag`, `activity`
//! and similar fields this tool ignores (they still feed the identifier).
//! `accuracy` is occasionally missing; it is read as 0.
//!
//! ### Semantic Location History
//! One file per month, `{ "timelineObjects": [ ... ] }`. Each entry holds
//! either an `activitySegment` or a `placeVisit`; only the latter is
//! imported. A `placeVisit.location` may lack `address`, `name`, and even
//! the coordinates: visits without coordinates are skipped.

use serde::Deserialize;
use serde_json::Value;

/// Top-level shape of `Records.json`.
#[derive(Debug, Deserialize)]
pub struct RecordsFile {
    #[serde(default)]
    pub locations: Vec<Value>,
}

/// Top-level shape of a semantic location history file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticFile {
    #[serde(default)]
    pub timeline_objects: Vec<Value>,
}

/// A raw point fix from `Records.json`.
#[derive(Debug, Deserialize)]
pub struct TakeoutLocation {
    #[serde(rename = "latitudeE7")]
    pub latitude_e7: i64,
    #[serde(rename = "longitudeE7")]
    pub longitude_e7: i64,
    /// Metres.
    #[serde(default)]
    pub accuracy: Option<f64>,
    pub timestamp: String,
}

/// The `placeVisit` payload of a timeline object.
///
/// `location` and `duration` are optional here so a visit without
/// coordinates can be skipped before its duration is looked at.
#[derive(Debug, Deserialize)]
pub struct PlaceVisit {
    #[serde(default)]
    pub location: Option<PlaceVisitLocation>,
    #[serde(default)]
    pub duration: Option<VisitDuration>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceVisitLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "latitudeE7")]
    pub latitude_e7: Option<i64>,
    #[serde(default, rename = "longitudeE7")]
    pub longitude_e7: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDuration {
    pub start_timestamp: String,
    pub end_timestamp: String,
}
