//! Candidate deduplication against the persisted link sets
//!
//! Pure set filtering, no side effects: the same candidates filtered twice
//! against the same known sets always yield the same residual, with zero
//! additional duplicates removed the second time.

use std::collections::{BTreeSet, HashSet};

/// Result of filtering a candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutcome {
    /// Candidates not present in any known set
    pub residual: BTreeSet<String>,

    /// How many candidates were already known
    pub duplicates: usize,
}

/// Removes every candidate present in `known`
pub fn filter_known(candidates: &BTreeSet<String>, known: &HashSet<String>) -> BTreeSet<String> {
    candidates
        .iter()
        .filter(|link| !known.contains(link.as_str()))
        .cloned()
        .collect()
}

/// Filters candidates against the persisted article links, then against the
/// persisted redirect links
///
/// Equivalent to filtering once against the union of both sets; the two
/// passes mirror the two record classes in the store.
pub fn filter_candidates(
    candidates: BTreeSet<String>,
    article_links: &HashSet<String>,
    redirect_links: &HashSet<String>,
) -> DedupOutcome {
    let total = candidates.len();
    let residual = filter_known(&filter_known(&candidates, article_links), redirect_links);

    DedupOutcome {
        duplicates: total - residual.len(),
        residual,
    }
}
