//! Harvest pipeline
//!
//! The incremental crawl core: per-listing link discovery, set-based
//! deduplication against the persisted link sets, per-article extraction
//! with redirect classification and a photo fallback chain, and the
//! orchestration loop that ties them together and aggregates run counts.

mod dedup;
mod discover;
mod extract;
mod orchestrator;
mod stats;

pub use dedup::{filter_candidates, filter_known, DedupOutcome};
pub use discover::discover_links;
pub use extract::{extract_article, ExtractOutcome, NO_PHOTO};
pub use orchestrator::{run_harvest, Harvester};
pub use stats::{print_report, HarvestReport, ListingStats, RunStats};

use crate::session::{Session, SessionError, SessionResult};
use std::time::Duration;

/// Loads a page, tolerating one navigation timeout by refreshing
///
/// The refreshed page is not re-checked before element reads; a page that
/// still failed to load surfaces later as an ordinary missing-element
/// condition. After a successful load the configured settle delay is
/// applied; the refresh path skips it.
pub(crate) async fn navigate_with_refresh<S: Session>(
    session: &mut S,
    url: &str,
    settle: Duration,
) -> SessionResult<()> {
    match session.navigate(url).await {
        Ok(()) => {
            if !settle.is_zero() {
                tokio::time::sleep(settle).await;
            }
            Ok(())
        }
        Err(SessionError::Timeout { .. }) => {
            tracing::warn!(url, "page has not loaded, refreshing");
            session.refresh().await
        }
        Err(e) => Err(e),
    }
}
