//! Crawl orchestration
//!
//! The Harvester owns the session, the store, and the image store for the
//! duration of one run and walks the configured listing pages in order:
//! discover candidate links, drop everything the store already knows, then
//! extract each residual link one at a time. Listing order affects only
//! progress reporting; the dedup sets are keyed by link, so the persisted
//! outcome is the same whatever the order.

use crate::config::{Config, ListingPage};
use crate::harvest::dedup::filter_candidates;
use crate::harvest::discover::discover_links;
use crate::harvest::extract::{extract_article, ExtractOutcome};
use crate::harvest::stats::{HarvestReport, ListingStats, RunStats};
use crate::images::ImageStore;
use crate::session::{Cookie, HttpSession, Session};
use crate::storage::{LinkKind, SqliteStore, Store};
use crate::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Orchestrates one harvest run over the configured listing pages
pub struct Harvester<S: Session> {
    config: Config,
    session: S,
    store: SqliteStore,
    images: ImageStore,
}

impl<S: Session> Harvester<S> {
    /// Creates a harvester from already-constructed collaborators
    pub fn new(config: Config, session: S, store: SqliteStore, images: ImageStore) -> Self {
        Self {
            config,
            session,
            store,
            images,
        }
    }

    /// Runs the full harvest and returns the aggregated report
    pub async fn run(&mut self) -> Result<HarvestReport> {
        let started = Instant::now();
        tracing::info!(listings = self.config.listings.len(), "starting harvest run");

        self.apply_cookies().await?;

        let mut totals = RunStats::default();
        let mut listings = Vec::new();

        for listing in self.config.listings.clone() {
            let stats = self.harvest_listing(&listing).await?;
            totals.absorb(&stats);
            listings.push(stats);
        }

        let elapsed = started.elapsed();
        tracing::info!(
            discovered = totals.discovered,
            duplicates = totals.duplicates,
            persisted = totals.persisted,
            redirected = totals.redirected,
            failed = totals.failed,
            elapsed_secs = elapsed.as_secs_f64(),
            "harvest run complete"
        );

        Ok(HarvestReport {
            totals,
            listings,
            elapsed,
        })
    }

    /// Loads the main page and injects the configured cookies, then
    /// refreshes so they take effect (consent banners, popup suppression)
    async fn apply_cookies(&mut self) -> Result<()> {
        if self.config.site.cookies.is_empty() {
            return Ok(());
        }

        self.session.navigate(&self.config.site.base_url).await?;

        for cookie in &self.config.site.cookies {
            self.session.add_cookie(&Cookie {
                name: cookie.name.clone(),
                value: cookie.value.clone(),
                domain: cookie.domain.clone(),
                path: cookie.path.clone(),
                secure: cookie.secure,
            })?;
        }

        self.session.refresh().await?;
        tracing::info!(
            cookies = self.config.site.cookies.len(),
            "session cookies applied"
        );
        Ok(())
    }

    /// Discover → deduplicate → extract for one listing page
    async fn harvest_listing(&mut self, listing: &ListingPage) -> Result<ListingStats> {
        let settle = self.settle_delay();
        let mut stats = ListingStats::new(&listing.tag);

        let candidates = discover_links(&mut self.session, &listing.url, settle).await?;
        stats.discovered = candidates.len();

        let article_links = self.store.fetch_links(LinkKind::Article)?;
        let redirect_links = self.store.fetch_links(LinkKind::Redirect)?;
        let outcome = filter_candidates(candidates, &article_links, &redirect_links);
        stats.duplicates = outcome.duplicates;

        tracing::info!(
            tag = %listing.tag,
            duplicates = outcome.duplicates,
            residual = outcome.residual.len(),
            "candidates filtered against store"
        );

        if outcome.residual.is_empty() {
            tracing::info!(tag = %listing.tag, "no new articles in topic");
            return Ok(stats);
        }

        let total = outcome.residual.len();
        for (index, link) in outcome.residual.iter().enumerate() {
            tracing::info!(page = index + 1, total, tag = %listing.tag, "scraping article page");

            let result = extract_article(
                &mut self.session,
                &mut self.store,
                &self.images,
                link,
                &listing.tag,
                settle,
            )
            .await?;

            match result {
                ExtractOutcome::Persisted => stats.persisted += 1,
                ExtractOutcome::Redirected => stats.redirected += 1,
                ExtractOutcome::Failed => stats.failed += 1,
            }
        }

        Ok(stats)
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.config.site.settle_delay_ms)
    }
}

/// Builds the collaborators from configuration and runs one harvest
///
/// This is the entry point the binary uses: the session, the store, and the
/// image store are created at run start, owned by the harvester, and
/// released when the run ends on any exit path.
pub async fn run_harvest(config: Config) -> Result<HarvestReport> {
    let store = SqliteStore::open(Path::new(&config.storage.database_path))?;
    let images = ImageStore::new(
        Path::new(&config.storage.images_dir),
        Duration::from_secs(config.storage.download_timeout_secs),
    )?;
    let session = HttpSession::new(&config.site.user_agent)?;

    let mut harvester = Harvester::new(config, session, store, images);
    harvester.run().await
}

#[cfg(test)]
impl<S: Session> Harvester<S> {
    pub(crate) fn session(&self) -> &S {
        &self.session
    }
}
