use geory_geocode::GeocodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TakeoutError {
    /// A visit-shaped object without the payload a visit needs.
    #[error("invalid visit record: {reason}")]
    InvalidRecord { reason: String },

    #[error("JSON parse error for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid timestamp \"{value}\" in {field}: {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {root}: {source}")]
    Walk {
        root: String,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}
