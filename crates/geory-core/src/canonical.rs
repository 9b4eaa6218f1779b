//! The Geory database schema: canonical locations and visits.
//!
//! Only the fields this tool reads or writes are typed. Everything else an
//! existing backup carries is captured in the `extra` maps and written back
//! unchanged, so merging never drops data the app put there.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::json_number;

/// Timezone recorded on every imported visit. The Takeout export carries no
/// usable zone, so this is a fixed literal rather than a derived value.
pub const IMPORTED_VISIT_TIMEZONE: &str = "UTC";

/// A record that is keyed by its content-hash identifier.
pub trait Identified {
    fn identifier(&self) -> &str;
}

/// A full Geory database backup file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoryDatabase {
    #[serde(default)]
    pub locations: Vec<CanonicalLocation>,
    #[serde(default)]
    pub visits: Vec<CanonicalVisit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A single point fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLocation {
    pub time: LocationTime,
    /// Lowercase hex SHA-256 of the raw record this location was mapped from.
    pub identifier: String,
    pub geometry: LocationGeometry,
    pub meta: LocationMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTime {
    /// Unix seconds, with millisecond fractions.
    #[serde(serialize_with = "json_number::serialize")]
    pub timestamp: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGeometry {
    #[serde(serialize_with = "json_number::serialize")]
    pub latitude: f64,
    #[serde(serialize_with = "json_number::serialize")]
    pub longitude: f64,
    /// Metres.
    #[serde(serialize_with = "json_number::serialize")]
    pub accuracy: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMeta {
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_imported: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalLocation {
    /// Builds a location as it is written for a freshly imported point fix:
    /// visible and flagged as imported.
    #[must_use]
    pub fn imported(
        identifier: String,
        timestamp: f64,
        latitude: f64,
        longitude: f64,
        accuracy: f64,
    ) -> Self {
        Self {
            time: LocationTime {
                timestamp,
                extra: Map::new(),
            },
            identifier,
            geometry: LocationGeometry {
                latitude,
                longitude,
                accuracy,
                extra: Map::new(),
            },
            meta: LocationMeta {
                is_hidden: false,
                is_imported: true,
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }
}

impl Identified for CanonicalLocation {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// ---------------------------------------------------------------------------
// Visits
// ---------------------------------------------------------------------------

/// A stay at a named place between an arrival and a departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVisit {
    pub meta: VisitMeta,
    pub identifier: String,
    pub geometry: VisitGeometry,
    pub time: VisitTime,
    #[serde(default)]
    pub details: VisitDetails,
    #[serde(default)]
    pub weather: VisitWeather,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editorial flags the app toggles; all false on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitMeta {
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub is_recovered: bool,
    #[serde(default)]
    pub is_highlight: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitGeometry {
    /// Always 0 for imported visits; they carry no GPS accuracy figure.
    #[serde(serialize_with = "json_number::serialize")]
    pub accuracy: f64,
    pub address: Option<String>,
    #[serde(serialize_with = "json_number::serialize")]
    pub longitude: f64,
    #[serde(serialize_with = "json_number::serialize")]
    pub latitude: f64,
    pub name: Option<String>,
    #[serde(default)]
    pub temporary: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitTime {
    #[serde(serialize_with = "json_number::serialize")]
    pub arrival: f64,
    #[serde(serialize_with = "json_number::serialize")]
    pub departure: f64,
    pub timezone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitDetails {
    #[serde(default)]
    pub companions: Vec<Value>,
    #[serde(default)]
    pub transport: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub notes: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Weather at the time of the visit. The app fills this in later; imports
/// leave every field null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitWeather {
    #[serde(default)]
    pub condition: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub feels: Option<Value>,
    #[serde(default)]
    pub wind_deg: Option<Value>,
    #[serde(default)]
    pub humidity: Option<Value>,
    #[serde(default)]
    pub wind_speed: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalVisit {
    /// Builds a visit as it is written for a freshly imported place visit:
    /// no accuracy, UTC timezone, and empty details, weather and flags.
    #[must_use]
    pub fn imported(
        identifier: String,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
        name: Option<String>,
        arrival: f64,
        departure: f64,
    ) -> Self {
        Self {
            meta: VisitMeta::default(),
            identifier,
            geometry: VisitGeometry {
                accuracy: 0.0,
                address,
                longitude,
                latitude,
                name,
                temporary: None,
                extra: Map::new(),
            },
            time: VisitTime {
                arrival,
                departure,
                timezone: IMPORTED_VISIT_TIMEZONE.to_string(),
                extra: Map::new(),
            },
            details: VisitDetails::default(),
            weather: VisitWeather::default(),
            extra: Map::new(),
        }
    }
}

impl Identified for CanonicalVisit {
    fn identifier(&self) -> &str {
        &self.identifier
    }
}

#[cfg(test)]
#[path = "canonical_test.rs"]
mod tests;
