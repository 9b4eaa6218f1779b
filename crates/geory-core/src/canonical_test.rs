use serde_json::json;

use super::*;

fn sample_database() -> Value {
    json!({
        "version": 3,
        "locations": [
            {
                "time": { "timestamp": 1_672_531_200 },
                "identifier": "abc",
                "geometry": { "latitude": 51.522_235_7, "longitude": -0.792_038, "accuracy": 10, "altitude": 41.5 },
                "meta": { "isHidden": false, "isImported": false }
            }
        ],
        "visits": [
            {
                "meta": { "isEdited": true, "isFixed": false, "isRecovered": false, "isHighlight": true, "isHidden": false },
                "identifier": "visit-1",
                "geometry": {
                    "accuracy": 0,
                    "address": "Burchetts Green Lane",
                    "longitude": -0.792_038,
                    "latitude": 51.522_235_7,
                    "name": "Great Oaks",
                    "temporary": null
                },
                "time": { "arrival": 1_672_531_200, "departure": 1_672_534_800.5, "timezone": "Europe/London" },
                "details": { "companions": ["Sam"], "transport": "car", "rating": 4, "notes": null },
                "weather": { "condition": "cloudy", "temperature": 7.5, "feels": null, "wind_deg": null, "humidity": 81, "wind_speed": null },
                "photos": ["IMG_0001"]
            }
        ]
    })
}

#[test]
fn database_round_trip_preserves_unknown_fields() {
    let input = sample_database();
    let db: GeoryDatabase = serde_json::from_value(input.clone()).unwrap();

    assert_eq!(db.extra.get("version"), Some(&json!(3)));
    assert_eq!(db.locations[0].geometry.extra.get("altitude"), Some(&json!(41.5)));
    assert_eq!(db.visits[0].extra.get("photos"), Some(&json!(["IMG_0001"])));

    let output = serde_json::to_value(&db).unwrap();
    assert_eq!(output, input);
}

#[test]
fn database_without_collections_defaults_to_empty() {
    let db: GeoryDatabase = serde_json::from_value(json!({})).unwrap();
    assert!(db.locations.is_empty());
    assert!(db.visits.is_empty());
}

#[test]
fn imported_location_shape() {
    let location = CanonicalLocation::imported(
        "def".to_string(),
        1_672_531_200.0,
        51.522_235_7,
        -0.792_038,
        10.0,
    );
    let value = serde_json::to_value(&location).unwrap();
    assert_eq!(
        value,
        json!({
            "time": { "timestamp": 1_672_531_200 },
            "identifier": "def",
            "geometry": { "latitude": 51.522_235_7, "longitude": -0.792_038, "accuracy": 10 },
            "meta": { "isHidden": false, "isImported": true }
        })
    );
    assert_eq!(location.identifier(), "def");
}

#[test]
fn imported_visit_shape() {
    let visit = CanonicalVisit::imported(
        "v1".to_string(),
        51.5,
        -0.75,
        Some("10 Main St".to_string()),
        Some("Home".to_string()),
        1_672_531_200.0,
        1_672_534_800.0,
    );
    let value = serde_json::to_value(&visit).unwrap();
    assert_eq!(
        value,
        json!({
            "meta": { "isEdited": false, "isFixed": false, "isRecovered": false, "isHighlight": false, "isHidden": false },
            "identifier": "v1",
            "geometry": {
                "accuracy": 0,
                "address": "10 Main St",
                "longitude": -0.75,
                "latitude": 51.5,
                "name": "Home",
                "temporary": null
            },
            "time": { "arrival": 1_672_531_200, "departure": 1_672_534_800, "timezone": "UTC" },
            "details": { "companions": [], "transport": null, "rating": null, "notes": null },
            "weather": { "condition": null, "temperature": null, "feels": null, "wind_deg": null, "humidity": null, "wind_speed": null }
        })
    );
}

#[test]
fn visit_without_details_or_weather_gets_empty_defaults() {
    let value = json!({
        "meta": {},
        "identifier": "v2",
        "geometry": { "accuracy": 0, "address": null, "longitude": 1.0, "latitude": 2.0, "name": null },
        "time": { "arrival": 0, "departure": 60, "timezone": "UTC" }
    });
    let visit: CanonicalVisit = serde_json::from_value(value).unwrap();
    assert_eq!(visit.details, VisitDetails::default());
    assert_eq!(visit.weather, VisitWeather::default());
    assert!(visit.geometry.temporary.is_none());
    assert!(!visit.meta.is_edited);
}
