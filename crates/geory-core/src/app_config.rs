use std::path::PathBuf;

/// Runtime settings for a merge run, read from `GEORY_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Where reverse-geocoding responses are persisted between runs.
    pub places_cache_path: PathBuf,
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    /// Pause after every cache miss, to stay inside the upstream usage policy.
    pub geocoder_delay_ms: u64,
    /// Inserted before the database file extension to name the merged output.
    pub output_suffix: String,
}
