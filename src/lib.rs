//! Teamarr Core - stream classification and match-rate accounting for
//! event-based EPG generation.
//!
//! This crate provides:
//! - Positive game-stream detection (matchup indicators: vs, @, at)
//! - Unsupported-sport heuristics (boxing/MMA cards, beach soccer, futsal)
//! - A closed filter/match reason taxonomy with display text, countability
//!   and statistics-bucket projections that cannot drift apart
//! - Batch stream filtering with exact per-reason tallies
//! - A classification pipeline over pluggable collaborators (team
//!   resolver, schedule source, league policy)
//! - Match-rate accounting over countable outcomes, with rayon batch
//!   processing
//!
//! The pipeline is pure, synchronous and free of shared mutable state; it
//! is safe to run one classification per channel group concurrently.

pub mod accounting;
pub mod classify;
pub mod detect;
pub mod filter;
pub mod league_config;
pub mod reasons;
pub mod types;

pub use accounting::{countable_total, get_filter_summary, MatchStats};
pub use classify::{
    classify_candidate, classify_candidates, ClassifyContext, LeaguePolicy, MatchVerdict,
    ScheduleError, ScheduleSource, StreamOutcome, TeamResolver,
};
pub use detect::{has_game_indicator, is_beach_soccer, is_boxing_mma, is_futsal};
pub use filter::{filter_game_streams, FilterResult, FilteredStream, StreamFilter};
pub use league_config::{get_league_config, get_league_codes, GroupLeaguePolicy, LeagueConfig};
pub use reasons::{
    display_text_for_raw, normalize_reason, verify_taxonomy, DisplayParams, FilterReason,
};
pub use types::{
    EventStatus, GroupSettings, ResolvedMatchup, ScheduledEvent, StreamRecord, TeamIdentity,
};

/// Everything one classification run produced, ready for the EPG
/// generator, the UI and the statistics store.
#[derive(Clone, Debug, serde::Serialize)]
pub struct BatchOutcome {
    /// Total streams received from the provider.
    pub total: usize,
    pub filter: FilterResult,
    pub outcomes: Vec<StreamOutcome>,
    pub stats: MatchStats,
}

impl BatchOutcome {
    /// Summary line for the UI, e.g. "6/8 matched (2 non-game filtered)".
    ///
    /// The denominator is countable candidates only: streams the classifier
    /// rejected with a pre-match code (unsupported sport, unparsed teams)
    /// count as filtered alongside the filter-stage rejections.
    pub fn summary(&self) -> String {
        get_filter_summary(
            self.total,
            self.stats.countable() as usize,
            self.stats.matched as usize,
        )
    }
}

/// Run one full classification pass: filter the provider's stream list,
/// classify the surviving candidates against the schedule, and account
/// for every outcome.
pub fn classify_batch(streams: &[StreamRecord], ctx: &ClassifyContext) -> BatchOutcome {
    let filter = StreamFilter::from_settings(ctx.settings).partition(streams);
    let outcomes = classify_candidates(ctx, &filter.game_streams);
    let stats = MatchStats::from_batch(&filter, &outcomes);

    BatchOutcome {
        total: streams.len(),
        filter,
        outcomes,
        stats,
    }
}
