pub mod app_config;
pub mod canonical;
pub mod config;
pub mod identifier;
pub mod json_number;

pub use app_config::AppConfig;
pub use canonical::{
    CanonicalLocation, CanonicalVisit, GeoryDatabase, Identified, LocationGeometry, LocationMeta,
    LocationTime, VisitDetails, VisitGeometry, VisitMeta, VisitTime, VisitWeather,
    IMPORTED_VISIT_TIMEZONE,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use identifier::record_identifier;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
