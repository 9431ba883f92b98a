//! Configuration module for Semafor
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration names the target site, the cookies injected at
//! run start, the topic listing pages with their tags, and the persistence
//! paths.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CookieConfig, ListingPage, SiteConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
