//! Nominatim `reverse` response types.
//!
//! Only the fields used for naming visits are typed; the rest of the response
//! is kept in `extra` so the places cache keeps every field the service
//! returned. Fields the service left out are left out again on write.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `format=jsonv2` reverse-geocoding response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "GeocodeAddress::is_empty")]
    pub address: GeocodeAddress,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured address breakdown of a [`GeocodeResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeocodeAddress {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.house_number.is_none() && self.road.is_none() && self.extra.is_empty()
    }
}

impl GeocodeResult {
    /// Short human name for the place.
    ///
    /// The result's own `name` when it is non-empty; otherwise
    /// `"<house_number> <road>"` with missing parts left out. Returns an empty
    /// string when none of these are available.
    #[must_use]
    pub fn place_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_owned();
        }

        [
            self.address.house_number.as_deref(),
            self.address.road.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// The service's error message, for responses such as
    /// `{"error": "Unable to geocode"}` that arrive with a 200 status.
    #[must_use]
    pub fn service_error(&self) -> Option<&str> {
        self.extra.get("error").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn result(name: Option<&str>, house_number: Option<&str>, road: Option<&str>) -> GeocodeResult {
        GeocodeResult {
            name: name.map(str::to_owned),
            display_name: Some("Great Oaks, Burchetts Green Lane, Hurley".to_owned()),
            address: GeocodeAddress {
                house_number: house_number.map(str::to_owned),
                road: road.map(str::to_owned),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }

    #[test]
    fn place_name_prefers_result_name() {
        let r = result(Some("Great Oaks"), Some("12"), Some("Burchetts Green Lane"));
        assert_eq!(r.place_name(), "Great Oaks");
    }

    #[test]
    fn place_name_synthesizes_house_number_and_road() {
        let r = result(None, Some("12"), Some("Burchetts Green Lane"));
        assert_eq!(r.place_name(), "12 Burchetts Green Lane");
    }

    #[test]
    fn place_name_treats_empty_name_as_missing() {
        let r = result(Some(""), Some("12"), Some("Burchetts Green Lane"));
        assert_eq!(r.place_name(), "12 Burchetts Green Lane");
    }

    #[test]
    fn place_name_omits_missing_parts_without_stray_spaces() {
        assert_eq!(
            result(None, None, Some("Burchetts Green Lane")).place_name(),
            "Burchetts Green Lane"
        );
        assert_eq!(result(None, Some("12"), None).place_name(), "12");
        assert_eq!(result(None, None, None).place_name(), "");
    }

    #[test]
    fn deserializes_nominatim_response_and_keeps_extra_fields() {
        let body = json!({
            "place_id": 244_695_564,
            "lat": "51.5224255",
            "lon": "-0.7919195710127758",
            "category": "building",
            "name": "Great Oaks",
            "display_name": "Great Oaks, Burchetts Green Lane, Hurley, Bisham, SL6 3QW, United Kingdom",
            "address": {
                "building": "Great Oaks",
                "road": "Burchetts Green Lane",
                "postcode": "SL6 3QW",
                "country_code": "gb"
            }
        });
        let parsed: GeocodeResult = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Great Oaks"));
        assert_eq!(parsed.address.road.as_deref(), Some("Burchetts Green Lane"));
        assert!(parsed.address.house_number.is_none());
        assert_eq!(parsed.extra.get("place_id"), Some(&json!(244_695_564)));

        assert_eq!(serde_json::to_value(&parsed).unwrap(), body);
    }

    #[test]
    fn error_response_parses_with_empty_address() {
        let parsed: GeocodeResult =
            serde_json::from_value(json!({"error": "Unable to geocode"})).unwrap();
        assert_eq!(parsed.service_error(), Some("Unable to geocode"));
        assert!(parsed.display_name.is_none());
        assert_eq!(parsed.place_name(), "");
    }

    #[test]
    fn absent_fields_stay_absent_when_reserialized() {
        let body = json!({"error": "Unable to geocode"});
        let parsed: GeocodeResult = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), body);

        let body = json!({"place_id": 7, "display_name": "Hurley", "address": {"village": "Hurley"}});
        let parsed: GeocodeResult = serde_json::from_value(body.clone()).unwrap();
        let written = serde_json::to_value(&parsed).unwrap();
        assert_eq!(written, body);
        assert!(written.get("name").is_none());
    }
}
