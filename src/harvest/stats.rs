//! Run statistics and summary output

use std::time::Duration;

/// Aggregated counts for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Candidate links found across all listing pages
    pub discovered: usize,

    /// Candidates already known to the store
    pub duplicates: usize,

    /// New article records written
    pub persisted: usize,

    /// New redirect records written
    pub redirected: usize,

    /// Links skipped because a required field was missing
    pub failed: usize,
}

impl RunStats {
    /// Folds one listing page's counts into the totals
    pub fn absorb(&mut self, listing: &ListingStats) {
        self.discovered += listing.discovered;
        self.duplicates += listing.duplicates;
        self.persisted += listing.persisted;
        self.redirected += listing.redirected;
        self.failed += listing.failed;
    }
}

/// Counts for one listing page
#[derive(Debug, Clone)]
pub struct ListingStats {
    pub tag: String,
    pub discovered: usize,
    pub duplicates: usize,
    pub persisted: usize,
    pub redirected: usize,
    pub failed: usize,
}

impl ListingStats {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            discovered: 0,
            duplicates: 0,
            persisted: 0,
            redirected: 0,
            failed: 0,
        }
    }
}

/// Everything a completed run reports
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub totals: RunStats,
    pub listings: Vec<ListingStats>,
    pub elapsed: Duration,
}

/// Prints the run summary to stdout
pub fn print_report(report: &HarvestReport) {
    println!("=== Harvest Summary ===\n");

    for listing in &report.listings {
        println!(
            "  {:<24} discovered {:>3}, duplicates {:>3}, persisted {:>3}, redirected {:>3}, failed {:>3}",
            listing.tag,
            listing.discovered,
            listing.duplicates,
            listing.persisted,
            listing.redirected,
            listing.failed
        );
    }

    let totals = &report.totals;
    println!();
    println!("Totals:");
    println!("  Discovered: {}", totals.discovered);
    println!("  Duplicates: {}", totals.duplicates);
    println!("  Persisted:  {}", totals.persisted);
    println!("  Redirected: {}", totals.redirected);
    println!("  Failed:     {}", totals.failed);
    println!();
    println!("Run took {:.2} seconds", report.elapsed.as_secs_f64());
}
