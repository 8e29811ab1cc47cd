pub mod app_config;
pub mod config;
pub mod poi;
pub mod regions;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use poi::{PoiRecord, StoreRef};
pub use regions::{parse_region_code, resolve_regions, REGION_CODES};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("unknown region code \"{0}\"")]
    UnknownRegion(String),
}
