//! Integration tests for `CachedGeocoder` using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use geory_geocode::{
    cache_key, CachedGeocoder, GeocodeCache, GeocodeError, LookupStats, NominatimClient,
    ReverseGeocode,
};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAT: f64 = 51.522_235_7;
const LNG: f64 = -0.792_038;

fn great_oaks() -> serde_json::Value {
    serde_json::json!({
        "place_id": 244_695_564,
        "name": "Great Oaks",
        "display_name": "Great Oaks, Burchetts Green Lane, Hurley, Bisham, Royal Borough of Windsor and Maidenhead, England, SL6 3QW, United Kingdom",
        "address": {
            "building": "Great Oaks",
            "road": "Burchetts Green Lane",
            "postcode": "SL6 3QW",
            "country_code": "gb"
        }
    })
}

fn geocoder(server: &MockServer, cache: GeocodeCache, delay: Duration) -> CachedGeocoder {
    let client = NominatimClient::with_base_url(
        &format!("{}/reverse.php", server.uri()),
        30,
        "geory-merge-tests/0.1",
    )
    .expect("client construction should not fail");
    CachedGeocoder::new(client, cache, delay)
}

#[tokio::test]
async fn cache_miss_fetches_once_and_persists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse.php"))
        .and(query_param("lat", "51.5222357"))
        .and(query_param("lon", "-0.792038"))
        .and(query_param("zoom", "18"))
        .and(query_param("format", "jsonv2"))
        .and(header("user-agent", "geory-merge-tests/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(great_oaks()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let cache_path = dir.path().join(".places-cache.json");
    let cache = GeocodeCache::load(&cache_path).unwrap();
    let mut geocoder = geocoder(&server, cache, Duration::ZERO);

    let first = geocoder.reverse_geocode(LAT, LNG).await.unwrap();
    assert_eq!(first.name.as_deref(), Some("Great Oaks"));

    // Same coordinates again: answered from the cache, no second request.
    let second = geocoder.reverse_geocode(LAT, LNG).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(geocoder.stats(), LookupStats { hits: 1, misses: 1 });

    // Written through before the second lookup even happened.
    let reloaded = GeocodeCache::load(&cache_path).unwrap();
    assert_eq!(
        reloaded
            .get(&cache_key(LAT, LNG))
            .and_then(|r| r.display_name.as_deref()),
        first.display_name.as_deref()
    );
}

#[tokio::test]
async fn cache_hit_makes_no_request_and_does_not_sleep() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(great_oaks()))
        .expect(0)
        .mount(&server)
        .await;

    let mut cache = GeocodeCache::in_memory();
    cache
        .insert(
            "51.5222357:-0.792038".to_owned(),
            serde_json::from_value(great_oaks()).unwrap(),
        )
        .unwrap();

    let delay = Duration::from_millis(500);
    let mut geocoder = geocoder(&server, cache, delay);

    let started = Instant::now();
    let result = geocoder.reverse_geocode(LAT, LNG).await.unwrap();
    assert!(started.elapsed() < delay, "cache hits must not be delayed");
    assert_eq!(result.place_name(), "Great Oaks");
    assert_eq!(geocoder.stats(), LookupStats { hits: 1, misses: 0 });
}

#[tokio::test]
async fn cache_miss_waits_for_the_rate_limit_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(great_oaks()))
        .expect(2)
        .mount(&server)
        .await;

    let delay = Duration::from_millis(150);
    let mut geocoder = geocoder(&server, GeocodeCache::in_memory(), delay);

    let started = Instant::now();
    geocoder.reverse_geocode(LAT, LNG).await.unwrap();
    geocoder.reverse_geocode(LAT + 0.001, LNG).await.unwrap();
    assert!(
        started.elapsed() >= delay * 2,
        "each miss should be followed by the delay, elapsed {:?}",
        started.elapsed()
    );
    assert_eq!(geocoder.stats().misses, 2);
    assert_eq!(geocoder.cache().len(), 2);
}

#[tokio::test]
async fn non_success_status_is_a_network_error_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("places.json");
    let cache = GeocodeCache::load(&cache_path).unwrap();
    let mut geocoder = geocoder(&server, cache, Duration::ZERO);

    let err = geocoder.reverse_geocode(LAT, LNG).await.unwrap_err();
    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
    assert!(err.is_network());
    assert!(geocoder.cache().is_empty());
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn unreachable_service_is_an_http_error() {
    let client = NominatimClient::with_base_url("http://127.0.0.1:1/reverse.php", 5, "geory-merge-tests/0.1")
        .expect("client construction should not fail");
    let mut geocoder = CachedGeocoder::new(client, GeocodeCache::in_memory(), Duration::ZERO);

    let err = geocoder.reverse_geocode(LAT, LNG).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Http(_)), "got {err:?}");
    assert!(err.is_network());
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let mut geocoder = geocoder(&server, GeocodeCache::in_memory(), Duration::ZERO);
    let err = geocoder.reverse_geocode(LAT, LNG).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Deserialize { .. }), "got {err:?}");
}
