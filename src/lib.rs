//! Semafor: an incremental news article harvester
//!
//! This crate walks a configured set of topic listing pages on a news site,
//! discovers article links, filters them against the links already recorded
//! in a SQLite store (both genuine articles and known redirects), and
//! extracts + persists each genuinely new article exactly once.

pub mod config;
pub mod harvest;
pub mod images;
pub mod session;
pub mod storage;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Image store error: {0}")]
    Image(#[from] images::ImageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{HarvestReport, Harvester, ListingStats, RunStats};
pub use session::{Cookie, Element, HttpSession, Session, SessionError};
pub use storage::{ArticleRecord, LinkKind, SqliteStore, Store};
