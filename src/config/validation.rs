use crate::config::types::{Config, CookieConfig, ListingPage, SiteConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(&config.site)?;
    validate_listings(&config.listings)?;
    validate_storage(&config.storage)?;
    Ok(())
}

fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    validate_page_url("base-url", &site.base_url)?;

    if site.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if site.settle_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "settle-delay-ms must be <= 60000ms, got {}ms",
            site.settle_delay_ms
        )));
    }

    for cookie in &site.cookies {
        validate_cookie(cookie)?;
    }

    Ok(())
}

fn validate_cookie(cookie: &CookieConfig) -> Result<(), ConfigError> {
    if cookie.name.is_empty() {
        return Err(ConfigError::Validation(
            "cookie name cannot be empty".to_string(),
        ));
    }

    if cookie.domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "cookie '{}' must have a domain",
            cookie.name
        )));
    }

    Ok(())
}

fn validate_listings(listings: &[ListingPage]) -> Result<(), ConfigError> {
    if listings.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[listing]] entry is required".to_string(),
        ));
    }

    for listing in listings {
        validate_page_url("listing url", &listing.url)?;

        if listing.tag.is_empty() {
            return Err(ConfigError::Validation(format!(
                "listing '{}' must have a non-empty tag",
                listing.url
            )));
        }
    }

    Ok(())
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    if storage.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if storage.images_dir.is_empty() {
        return Err(ConfigError::Validation(
            "images-dir cannot be empty".to_string(),
        ));
    }

    if storage.download_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "download-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_page_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use the http or https scheme",
            field, value
        )));
    }

    Ok(())
}
