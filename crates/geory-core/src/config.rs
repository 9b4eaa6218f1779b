use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse.php";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "geory-merge/0.1 (location-history-import)";
pub const DEFAULT_PLACES_CACHE_PATH: &str = ".places-cache.json";

/// Load merge configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load merge configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Every variable is optional; the lookup is injected so tests can drive it
/// from a `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("GEORY_LOG_LEVEL", "info");
    let places_cache_path = PathBuf::from(or_default(
        "GEORY_PLACES_CACHE_PATH",
        DEFAULT_PLACES_CACHE_PATH,
    ));
    let geocoder_base_url = or_default("GEORY_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);
    let geocoder_user_agent = or_default("GEORY_GEOCODER_USER_AGENT", DEFAULT_GEOCODER_USER_AGENT);
    let geocoder_timeout_secs = parse_u64("GEORY_GEOCODER_TIMEOUT_SECS", "30")?;
    let geocoder_delay_ms = parse_u64("GEORY_GEOCODER_DELAY_MS", "1000")?;

    let output_suffix = or_default("GEORY_OUTPUT_SUFFIX", "-merged");
    if output_suffix.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "GEORY_OUTPUT_SUFFIX".to_string(),
            reason: "suffix must not be empty or the input database would be overwritten"
                .to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        places_cache_path,
        geocoder_base_url,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_delay_ms,
        output_suffix,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
