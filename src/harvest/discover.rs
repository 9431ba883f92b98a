//! Link discovery on topic listing pages
//!
//! Loads one listing page and collects the hrefs of every anchor inside the
//! listing containers. The same article is often linked more than once on a
//! page (headline + thumbnail), so the result is a set.

use crate::harvest::navigate_with_refresh;
use crate::session::Session;
use crate::Result;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Container holding the article links on a listing page
pub(crate) const LISTING_CONTAINER_SELECTOR: &str = ".listaWiadomosciv3";

/// Anchors pointing at comment threads, not articles
pub(crate) const COMMENT_ANCHOR_MARKER: &str = "#disqus_thread";

/// Discovers candidate article links on one listing page
///
/// A missing listing container is non-fatal: it logs and contributes zero
/// links, and the run moves on to the next listing page.
pub async fn discover_links<S: Session>(
    session: &mut S,
    listing_url: &str,
    settle: Duration,
) -> Result<BTreeSet<String>> {
    navigate_with_refresh(session, listing_url, settle).await?;
    tracing::info!(listing = listing_url, "scraping listing page");

    let base = session
        .current_url()
        .and_then(|url| Url::parse(url).ok());

    let containers = session.find_elements(LISTING_CONTAINER_SELECTOR)?;
    if containers.is_empty() {
        tracing::warn!(
            listing = listing_url,
            selector = LISTING_CONTAINER_SELECTOR,
            "no listing container found on page"
        );
    }

    let mut links = BTreeSet::new();
    for container in &containers {
        for anchor in container.find_elements("a") {
            let Some(href) = anchor.attr("href") else {
                continue;
            };
            if href.contains(COMMENT_ANCHOR_MARKER) {
                continue;
            }
            if let Some(absolute) = resolve_href(base.as_ref(), href) {
                links.insert(absolute);
            }
        }
    }

    tracing::info!(listing = listing_url, found = links.len(), "candidate links discovered");
    Ok(links)
}

/// Resolves an href against the listing page URL
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match base {
        Some(base) => base.join(href).ok().map(|url| url.to_string()),
        None => Url::parse(href).ok().map(|url| url.to_string()),
    }
}
