use serde::Deserialize;

/// Main configuration structure for Semafor
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default, rename = "listing")]
    pub listings: Vec<ListingPage>,
    pub storage: StorageConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Main page of the site, loaded once at run start so cookies can be set
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Pause after each successful page load (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Cookies injected before the listing pass (consent banners, popups)
    #[serde(default, rename = "cookie")]
    pub cookies: Vec<CookieConfig>,
}

/// A cookie injected into the session at run start
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
}

/// One topic listing page and the tag stamped on every article found there
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    pub url: String,
    pub tag: String,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory article photos are downloaded into
    #[serde(rename = "images-dir")]
    pub images_dir: String,

    /// Timeout for a single photo download (seconds)
    #[serde(rename = "download-timeout-secs", default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

fn default_settle_delay_ms() -> u64 {
    3000
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_download_timeout_secs() -> u64 {
    300
}
