//! Match-rate accounting.
//!
//! Consumes the union of filter-stage rejections and classifier outcomes
//! and produces the user-visible match statistics. The denominator is
//! candidates that are countable, never raw provider totals: pre-match
//! rejections are content the system was never meant to match, while
//! countable failures (no event found, league disabled) are ones the user
//! can act on.

use serde::Serialize;
use std::collections::HashMap;

use crate::classify::StreamOutcome;
use crate::filter::FilterResult;
use crate::reasons::FilterReason;

/// Generate a human-readable summary of filtering results.
///
/// Renders `"{matched}/{candidates} matched ({filtered} non-game
/// filtered)"`, dropping the parenthetical when nothing was filtered.
///
/// Panics if `matched_count > game_count` or `game_count > total_count`;
/// either is an upstream logic bug and silently clamping would hide it.
pub fn get_filter_summary(total_count: usize, game_count: usize, matched_count: usize) -> String {
    assert!(
        game_count <= total_count,
        "candidate count {} exceeds total {}",
        game_count,
        total_count
    );
    assert!(
        matched_count <= game_count,
        "matched count {} exceeds candidate count {}",
        matched_count,
        game_count
    );

    let filtered_count = total_count - game_count;
    if filtered_count > 0 {
        format!(
            "{}/{} matched ({} non-game filtered)",
            matched_count, game_count, filtered_count
        )
    } else {
        format!("{}/{} matched", matched_count, game_count)
    }
}

/// Sum of outcomes that participate in the match-rate denominator.
pub fn countable_total<I>(reasons: I) -> usize
where
    I: IntoIterator<Item = FilterReason>,
{
    reasons.into_iter().filter(|r| r.is_countable()).count()
}

/// Exact, internally consistent per-outcome counts for one batch.
///
/// Handed to the persistence collaborator by value; aggregation across
/// time and write ordering are its concern, not ours.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchStats {
    /// Candidate streams matched to an event.
    pub matched: u32,
    /// Candidate streams that failed with a countable reason.
    pub countable_unmatched: u32,
    /// Rejections that never entered the denominator.
    pub uncountable: u32,
    /// Per-column tallies for the statistics store, keyed by stat bucket.
    pub bucket_counts: HashMap<&'static str, u32>,
}

impl MatchStats {
    /// Build stats from one batch: filter-stage rejections plus classifier
    /// outcomes.
    pub fn from_batch(filter: &FilterResult, outcomes: &[StreamOutcome]) -> Self {
        let mut stats = Self::default();
        for rejected in &filter.filtered_streams {
            stats.record_reason(rejected.reason);
        }
        for outcome in outcomes {
            match outcome.reason() {
                None => stats.matched += 1,
                Some(reason) => stats.record_reason(reason),
            }
        }
        stats
    }

    /// Tally one unmatched outcome.
    pub fn record_reason(&mut self, reason: FilterReason) {
        if reason.is_countable() {
            self.countable_unmatched += 1;
        } else {
            self.uncountable += 1;
        }
        if let Some(bucket) = reason.stat_bucket() {
            *self.bucket_counts.entry(bucket).or_insert(0) += 1;
        }
    }

    /// Streams in the match-rate denominator.
    pub fn countable(&self) -> u32 {
        self.matched + self.countable_unmatched
    }

    /// Matched fraction over countable streams; 0.0 when nothing was
    /// countable.
    pub fn match_rate(&self) -> f64 {
        let countable = self.countable();
        if countable == 0 {
            0.0
        } else {
            f64::from(self.matched) / f64::from(countable)
        }
    }
}
