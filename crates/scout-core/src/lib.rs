//! Domain types and configuration shared by the scout client crates.

mod app_config;
mod config;
pub mod display;
pub mod events;
pub mod log_buffer;
pub mod profile;
pub mod search;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::load_app_config_from_env;
pub use events::{JobEntry, ScoutReport, StreamEvent};
pub use log_buffer::{LogBuffer, LogEntry, LogKind, LOG_CAPACITY};
pub use profile::{load_profile, CandidateProfile, ProfileField, ProfileStore};
pub use search::{Location, SearchForm, SearchRequest};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profile file {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown location: {0} (expected one of Remote, USA, Europe, Asia, Worldwide, Hybrid)")]
    UnknownLocation(String),

    #[error("unknown profile field: {0} (expected experience, skills or goals)")]
    UnknownProfileField(String),
}
