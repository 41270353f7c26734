//! Filter/match reason taxonomy - single source of truth.
//!
//! Every classification outcome has three dependent projections that must
//! never drift apart:
//! - a stable code (`as_str`) persisted and passed between components
//! - user-facing display text (`display_text`)
//! - a statistics bucket for the persistence layer (`stat_bucket`)
//!
//! All three are `match` arms over the same closed enum, so adding a
//! variant without updating a projection is a compile error.
//! `verify_taxonomy()` re-checks the string round-trip at startup.

use serde::{Deserialize, Serialize};

/// Canonical classification outcome for one stream.
///
/// Codes are partitioned into three disjoint phases; a stream holds at most
/// one code at a time and reclassification replaces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterReason {
    // =========================================================================
    // Pre-match (decided before any schedule lookup)
    // =========================================================================
    /// Stream name carries no matchup indicator (vs, @, at).
    NoGameIndicator,
    /// User include pattern was configured and the name did not match it.
    IncludeRegexNotMatched,
    /// User exclusion pattern matched the name.
    ExcludeRegexMatched,
    /// Boxing/MMA card terminology; the schedule source cannot serve these.
    UnsupportedBoxingMma,
    /// Beach soccer naming convention on a team name.
    UnsupportedBeachSoccer,
    /// Futsal naming convention on a team name.
    UnsupportedFutsal,
    /// Team names could not be parsed out of the stream name.
    TeamsNotParsed,

    // =========================================================================
    // Post-parse, pre-lookup
    // =========================================================================
    /// One or both parsed teams are unknown to the schedule source.
    TeamsNotInSource,
    /// Both teams resolved but share no league.
    NoCommonLeague,

    // =========================================================================
    // Post-lookup
    // =========================================================================
    /// Event found but on a previous day.
    GamePast,
    /// Event found but already final, and finals are excluded by setting.
    GameFinalExcluded,
    /// No event found for the matchup.
    NoGameFound,
    /// Event found but beyond the lookahead window.
    OutsideLookahead,
    /// Shared league exists but is not enabled for the channel group.
    LeagueNotEnabled,
}

/// Classification phase a reason belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReasonPhase {
    PreMatch,
    PostParse,
    PostLookup,
}

/// Optional parameters for display-text rendering.
///
/// Parameterized entries degrade to an unparameterized default when the
/// parameter is absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisplayParams<'a> {
    pub lookahead_days: Option<u32>,
    pub league: Option<&'a str>,
}

impl<'a> DisplayParams<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_lookahead(days: u32) -> Self {
        Self {
            lookahead_days: Some(days),
            league: None,
        }
    }

    pub fn with_league(league: &'a str) -> Self {
        Self {
            lookahead_days: None,
            league: Some(league),
        }
    }
}

impl FilterReason {
    /// Every reason, for startup self-checks and exhaustive tests.
    pub const ALL: &'static [FilterReason] = &[
        FilterReason::NoGameIndicator,
        FilterReason::IncludeRegexNotMatched,
        FilterReason::ExcludeRegexMatched,
        FilterReason::UnsupportedBoxingMma,
        FilterReason::UnsupportedBeachSoccer,
        FilterReason::UnsupportedFutsal,
        FilterReason::TeamsNotParsed,
        FilterReason::TeamsNotInSource,
        FilterReason::NoCommonLeague,
        FilterReason::GamePast,
        FilterReason::GameFinalExcluded,
        FilterReason::NoGameFound,
        FilterReason::OutsideLookahead,
        FilterReason::LeagueNotEnabled,
    ];

    /// Stable code string, as persisted and as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterReason::NoGameIndicator => "no_game_indicator",
            FilterReason::IncludeRegexNotMatched => "include_regex_not_matched",
            FilterReason::ExcludeRegexMatched => "exclude_regex_matched",
            FilterReason::UnsupportedBoxingMma => "unsupported_boxing_mma",
            FilterReason::UnsupportedBeachSoccer => "unsupported_beach_soccer",
            FilterReason::UnsupportedFutsal => "unsupported_futsal",
            FilterReason::TeamsNotParsed => "teams_not_parsed",
            FilterReason::TeamsNotInSource => "teams_not_in_source",
            FilterReason::NoCommonLeague => "no_common_league",
            FilterReason::GamePast => "game_past",
            FilterReason::GameFinalExcluded => "game_final_excluded",
            FilterReason::NoGameFound => "no_game_found",
            FilterReason::OutsideLookahead => "outside_lookahead",
            FilterReason::LeagueNotEnabled => "league_not_enabled",
        }
    }

    /// Parse a canonical code string back to a reason.
    pub fn from_code_str(code: &str) -> Option<FilterReason> {
        FilterReason::ALL.iter().copied().find(|r| r.as_str() == code)
    }

    pub fn phase(&self) -> ReasonPhase {
        match self {
            FilterReason::NoGameIndicator
            | FilterReason::IncludeRegexNotMatched
            | FilterReason::ExcludeRegexMatched
            | FilterReason::UnsupportedBoxingMma
            | FilterReason::UnsupportedBeachSoccer
            | FilterReason::UnsupportedFutsal
            | FilterReason::TeamsNotParsed => ReasonPhase::PreMatch,
            FilterReason::TeamsNotInSource | FilterReason::NoCommonLeague => {
                ReasonPhase::PostParse
            }
            FilterReason::GamePast
            | FilterReason::GameFinalExcluded
            | FilterReason::NoGameFound
            | FilterReason::OutsideLookahead
            | FilterReason::LeagueNotEnabled => ReasonPhase::PostLookup,
        }
    }

    /// Whether this outcome participates in the match-rate denominator.
    ///
    /// Single source of truth: pre-match rejections are content the system
    /// was never meant to match; post-parse and post-lookup outcomes are
    /// failures the user can act on (adjust lookahead, enable a league).
    pub fn is_countable(&self) -> bool {
        self.phase() != ReasonPhase::PreMatch
    }

    /// User-facing display text for this reason.
    pub fn display_text(&self, params: &DisplayParams) -> String {
        match self {
            FilterReason::NoGameIndicator => "No game indicator (vs, @, at)".to_string(),
            FilterReason::IncludeRegexNotMatched => {
                "Did not match include pattern".to_string()
            }
            FilterReason::ExcludeRegexMatched => "Matched exclusion pattern".to_string(),
            FilterReason::UnsupportedBoxingMma => {
                "Boxing/MMA card (not supported)".to_string()
            }
            FilterReason::UnsupportedBeachSoccer => {
                "Beach soccer (not supported)".to_string()
            }
            FilterReason::UnsupportedFutsal => "Futsal (not supported)".to_string(),
            FilterReason::TeamsNotParsed => "Teams not parsed".to_string(),
            FilterReason::TeamsNotInSource => {
                "Teams not found in schedule source".to_string()
            }
            FilterReason::NoCommonLeague => "Teams share no league".to_string(),
            FilterReason::GamePast => "Event already passed".to_string(),
            FilterReason::GameFinalExcluded => "Event is final (excluded)".to_string(),
            FilterReason::NoGameFound => match params.lookahead_days {
                Some(days) => format!("No event in lookahead range ({} days)", days),
                None => "No event found".to_string(),
            },
            FilterReason::OutsideLookahead => "Outside lookahead range".to_string(),
            FilterReason::LeagueNotEnabled => match params.league {
                Some(league) => format!("League not enabled ({})", league),
                None => "League not enabled".to_string(),
            },
        }
    }

    /// Statistics column this reason is tallied under, if persisted.
    ///
    /// `GamePast`, `NoGameFound` and `OutsideLookahead` intentionally share
    /// one column: the persisted schema tracks them as a single
    /// "outside lookahead" counter and the UI distinguishes them through
    /// `display_text`. The three unsupported-sport codes likewise share a
    /// column. Reasons returning `None` are informational only and are
    /// never persisted as counters.
    pub fn stat_bucket(&self) -> Option<&'static str> {
        match self {
            FilterReason::NoGameIndicator => Some("filtered_no_indicator"),
            FilterReason::IncludeRegexNotMatched => Some("filtered_include_regex"),
            FilterReason::ExcludeRegexMatched => Some("filtered_exclude_regex"),
            FilterReason::UnsupportedBoxingMma
            | FilterReason::UnsupportedBeachSoccer
            | FilterReason::UnsupportedFutsal => Some("filtered_unsupported_sport"),
            FilterReason::TeamsNotParsed => Some("teams_not_parsed"),
            FilterReason::GamePast
            | FilterReason::NoGameFound
            | FilterReason::OutsideLookahead => Some("filtered_outside_lookahead"),
            FilterReason::GameFinalExcluded => Some("filtered_final"),
            // Informational only: surfaced per stream, never tallied.
            FilterReason::TeamsNotInSource
            | FilterReason::NoCommonLeague
            | FilterReason::LeagueNotEnabled => None,
        }
    }
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy free-text reason strings from older persisted records, mapped to
/// their canonical codes.
const LEGACY_REASONS: &[(&str, FilterReason)] = &[
    ("Game already completed (past)", FilterReason::GamePast),
    ("Game completed (excluded)", FilterReason::GameFinalExcluded),
    ("No game found between teams", FilterReason::NoGameFound),
];

/// Normalize a persisted reason string to a canonical code.
///
/// Accepts canonical code strings and legacy free-text strings. Returns
/// `None` for unrecognized text; callers keep such text as-is so older
/// data stays displayable.
pub fn normalize_reason(raw: &str) -> Option<FilterReason> {
    if let Some(reason) = FilterReason::from_code_str(raw) {
        return Some(reason);
    }
    LEGACY_REASONS
        .iter()
        .find(|(legacy, _)| *legacy == raw)
        .map(|(_, reason)| *reason)
}

/// Display text for a persisted reason string of unknown vintage.
///
/// Canonical and legacy strings render through the taxonomy; anything else
/// passes through unchanged rather than failing.
pub fn display_text_for_raw(raw: &str, params: &DisplayParams) -> String {
    match normalize_reason(raw) {
        Some(reason) => reason.display_text(params),
        None => raw.to_string(),
    }
}

/// Startup consistency check over the whole taxonomy.
///
/// The projections are total by construction (`match` over a closed enum);
/// this guards the parts the compiler cannot see: code-string round-trips,
/// code-string uniqueness and non-empty display text.
pub fn verify_taxonomy() -> anyhow::Result<()> {
    for reason in FilterReason::ALL {
        let code = reason.as_str();
        if code.is_empty() {
            anyhow::bail!("reason {:?} has an empty code string", reason);
        }
        match FilterReason::from_code_str(code) {
            Some(back) if back == *reason => {}
            other => anyhow::bail!(
                "code string {:?} does not round-trip: {:?} -> {:?}",
                code,
                reason,
                other
            ),
        }
        if reason.display_text(&DisplayParams::none()).is_empty() {
            anyhow::bail!("reason {:?} has empty display text", reason);
        }
        if let Some(bucket) = reason.stat_bucket() {
            if bucket.is_empty() {
                anyhow::bail!("reason {:?} has an empty stat bucket name", reason);
            }
        }
    }

    let mut codes: Vec<&str> = FilterReason::ALL.iter().map(|r| r.as_str()).collect();
    codes.sort_unstable();
    codes.dedup();
    if codes.len() != FilterReason::ALL.len() {
        anyhow::bail!("duplicate code strings in taxonomy");
    }

    Ok(())
}
