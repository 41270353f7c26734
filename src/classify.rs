//! Candidate stream classification.
//!
//! Takes streams that survived the filter stage and drives each through
//! the external collaborators (team resolver, schedule source, league
//! policy) to exactly one outcome: a matched event or a tagged reason.
//!
//! The pipeline itself is pure and synchronous - it holds no locks and
//! performs no I/O of its own; collaborators own any network or storage
//! access behind their trait seam. One bad stream or one flaky lookup
//! degrades that single stream, never the batch.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::detect::{is_beach_soccer, is_futsal};
use crate::reasons::{DisplayParams, FilterReason};
use crate::types::{GroupSettings, ResolvedMatchup, ScheduledEvent, StreamRecord, TeamIdentity};

/// Schedule source failure for one lookup.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule source unavailable: {0}")]
    Unavailable(String),
    #[error("schedule lookup failed for {league}: {message}")]
    Lookup { league: String, message: String },
}

/// Parses raw stream text into team identities.
///
/// Returning `None` means the teams could not be parsed; the stream is
/// classified `teams_not_parsed`.
pub trait TeamResolver: Send + Sync {
    fn resolve(&self, stream_name: &str) -> Option<ResolvedMatchup>;
}

/// Looks up zero-or-one scheduled event for a matchup in one league.
pub trait ScheduleSource: Send + Sync {
    fn find_event(
        &self,
        league: &str,
        team_a: &TeamIdentity,
        team_b: &TeamIdentity,
        as_of: NaiveDate,
    ) -> Result<Option<ScheduledEvent>, ScheduleError>;
}

/// Decides which leagues are enabled for a channel group.
pub trait LeaguePolicy: Send + Sync {
    fn is_enabled(&self, league: &str) -> bool;

    /// User-facing name for a league code.
    fn display_name(&self, league: &str) -> String;
}

/// Collaborators and settings for one classification run.
#[derive(Clone, Copy)]
pub struct ClassifyContext<'a> {
    pub resolver: &'a dyn TeamResolver,
    pub schedule: &'a dyn ScheduleSource,
    pub leagues: &'a dyn LeaguePolicy,
    pub settings: &'a GroupSettings,
    /// Reference time for past/lookahead decisions.
    pub as_of: DateTime<Utc>,
}

/// Final verdict for one candidate stream.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum MatchVerdict {
    Matched(ScheduledEvent),
    Unmatched {
        reason: FilterReason,
        /// Display parameter for reasons that carry one (league name).
        #[serde(skip_serializing_if = "Option::is_none")]
        league: Option<String>,
    },
}

/// One candidate stream's classification outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StreamOutcome {
    pub stream: StreamRecord,
    pub verdict: MatchVerdict,
}

impl StreamOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self.verdict, MatchVerdict::Matched(_))
    }

    pub fn reason(&self) -> Option<FilterReason> {
        match &self.verdict {
            MatchVerdict::Matched(_) => None,
            MatchVerdict::Unmatched { reason, .. } => Some(*reason),
        }
    }

    /// Human-readable explanation for UI display.
    pub fn display_text(&self, lookahead_days: u32) -> String {
        match &self.verdict {
            MatchVerdict::Matched(event) => event.name.clone(),
            MatchVerdict::Unmatched { reason, league } => {
                let params = DisplayParams {
                    lookahead_days: Some(lookahead_days),
                    league: league.as_deref(),
                };
                reason.display_text(&params)
            }
        }
    }
}

fn unmatched(stream: &StreamRecord, reason: FilterReason) -> StreamOutcome {
    StreamOutcome {
        stream: stream.clone(),
        verdict: MatchVerdict::Unmatched {
            reason,
            league: None,
        },
    }
}

/// Classify one candidate stream to exactly one outcome.
///
/// Phase order (first hit wins):
/// team parsing, unsupported-sport heuristics, source membership, league
/// intersection, league enablement, then schedule lookup.
pub fn classify_candidate(ctx: &ClassifyContext, stream: &StreamRecord) -> StreamOutcome {
    let matchup = match ctx.resolver.resolve(&stream.name) {
        Some(matchup) => matchup,
        None => return unmatched(stream, FilterReason::TeamsNotParsed),
    };

    let (team_a, team_b) = (&matchup.team_a, &matchup.team_b);

    if is_beach_soccer(&team_a.name, &team_b.name) {
        return unmatched(stream, FilterReason::UnsupportedBeachSoccer);
    }
    if is_futsal(&team_a.name, &team_b.name) {
        return unmatched(stream, FilterReason::UnsupportedFutsal);
    }
    if !team_a.in_source() || !team_b.in_source() {
        return unmatched(stream, FilterReason::TeamsNotInSource);
    }

    let common = matchup.common_leagues();
    if common.is_empty() {
        return unmatched(stream, FilterReason::NoCommonLeague);
    }

    let enabled: Vec<&str> = common
        .iter()
        .copied()
        .filter(|l| ctx.leagues.is_enabled(l))
        .collect();
    if enabled.is_empty() {
        return StreamOutcome {
            stream: stream.clone(),
            verdict: MatchVerdict::Unmatched {
                reason: FilterReason::LeagueNotEnabled,
                league: Some(ctx.leagues.display_name(common[0])),
            },
        };
    }

    let as_of_date = ctx.as_of.date_naive();
    for league in enabled {
        match ctx.schedule.find_event(league, team_a, team_b, as_of_date) {
            Ok(Some(event)) => return evaluate_event(ctx, stream, event),
            Ok(None) => continue,
            Err(err) => {
                // Degrade to "no event in this league" rather than failing
                // the stream or the batch.
                warn!(
                    "schedule lookup failed for {:?} in {}: {}",
                    stream.name, league, err
                );
                continue;
            }
        }
    }

    debug!("no event found for {:?}", stream.name);
    unmatched(stream, FilterReason::NoGameFound)
}

fn evaluate_event(
    ctx: &ClassifyContext,
    stream: &StreamRecord,
    event: ScheduledEvent,
) -> StreamOutcome {
    if event.date() < ctx.as_of.date_naive() {
        return unmatched(stream, FilterReason::GamePast);
    }
    if event.is_final() && ctx.settings.exclude_final_events {
        return unmatched(stream, FilterReason::GameFinalExcluded);
    }
    let horizon = ctx.as_of + Duration::days(i64::from(ctx.settings.lookahead_days));
    if event.kickoff > horizon {
        return unmatched(stream, FilterReason::OutsideLookahead);
    }
    StreamOutcome {
        stream: stream.clone(),
        verdict: MatchVerdict::Matched(event),
    }
}

/// Classify a batch of candidate streams in parallel.
///
/// Each stream's classification is independent; outcomes come back in
/// input order.
pub fn classify_candidates(
    ctx: &ClassifyContext,
    streams: &[StreamRecord],
) -> Vec<StreamOutcome> {
    streams
        .par_iter()
        .map(|stream| classify_candidate(ctx, stream))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league_config::GroupLeaguePolicy;
    use crate::types::EventStatus;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct MapResolver(HashMap<String, ResolvedMatchup>);

    impl TeamResolver for MapResolver {
        fn resolve(&self, stream_name: &str) -> Option<ResolvedMatchup> {
            self.0.get(stream_name).cloned()
        }
    }

    struct MapSchedule {
        // (league, team_a, team_b) -> event
        events: HashMap<(String, String, String), ScheduledEvent>,
        fail_leagues: Vec<String>,
    }

    impl ScheduleSource for MapSchedule {
        fn find_event(
            &self,
            league: &str,
            team_a: &TeamIdentity,
            team_b: &TeamIdentity,
            _as_of: NaiveDate,
        ) -> Result<Option<ScheduledEvent>, ScheduleError> {
            if self.fail_leagues.iter().any(|l| l == league) {
                return Err(ScheduleError::Unavailable("timeout".to_string()));
            }
            let key = (
                league.to_string(),
                team_a.name.clone(),
                team_b.name.clone(),
            );
            Ok(self.events.get(&key).cloned())
        }
    }

    fn team(name: &str, source_id: Option<&str>, leagues: &[&str]) -> TeamIdentity {
        TeamIdentity {
            name: name.to_string(),
            source_id: source_id.map(str::to_string),
            leagues: leagues.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn event(league: &str, kickoff: DateTime<Utc>, status: EventStatus) -> ScheduledEvent {
        ScheduledEvent {
            event_id: "401001".to_string(),
            name: "Lakers @ Celtics".to_string(),
            league: league.to_string(),
            kickoff,
            status,
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
    }

    struct Fixture {
        resolver: MapResolver,
        schedule: MapSchedule,
        leagues: GroupLeaguePolicy,
        settings: GroupSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let mut resolver = HashMap::new();
            resolver.insert(
                "NBA 01: Lakers vs Celtics".to_string(),
                ResolvedMatchup::new(
                    team("Lakers", Some("13"), &["nba"]),
                    team("Celtics", Some("2"), &["nba"]),
                ),
            );
            Self {
                resolver: MapResolver(resolver),
                schedule: MapSchedule {
                    events: HashMap::new(),
                    fail_leagues: Vec::new(),
                },
                leagues: GroupLeaguePolicy::new(&[]),
                settings: GroupSettings::default(),
            }
        }

        fn with_event(mut self, kickoff: DateTime<Utc>, status: EventStatus) -> Self {
            self.schedule.events.insert(
                (
                    "nba".to_string(),
                    "Lakers".to_string(),
                    "Celtics".to_string(),
                ),
                event("nba", kickoff, status),
            );
            self
        }

        fn classify(&self, name: &str) -> StreamOutcome {
            let ctx = ClassifyContext {
                resolver: &self.resolver,
                schedule: &self.schedule,
                leagues: &self.leagues,
                settings: &self.settings,
                as_of: as_of(),
            };
            classify_candidate(&ctx, &StreamRecord::new(name))
        }
    }

    #[test]
    fn test_matched_within_lookahead() {
        let fx = Fixture::new().with_event(
            Utc.with_ymd_and_hms(2025, 1, 12, 0, 30, 0).unwrap(),
            EventStatus::Scheduled,
        );
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert!(outcome.is_matched());
    }

    #[test]
    fn test_teams_not_parsed() {
        let fx = Fixture::new();
        let outcome = fx.classify("Something vs Unknown");
        assert_eq!(outcome.reason(), Some(FilterReason::TeamsNotParsed));
    }

    #[test]
    fn test_no_game_found() {
        let fx = Fixture::new();
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::NoGameFound));
    }

    #[test]
    fn test_game_past() {
        let fx = Fixture::new().with_event(
            Utc.with_ymd_and_hms(2025, 1, 9, 23, 0, 0).unwrap(),
            EventStatus::Final,
        );
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::GamePast));
    }

    #[test]
    fn test_final_excluded_by_setting() {
        let mut fx = Fixture::new().with_event(as_of(), EventStatus::Final);
        fx.settings.exclude_final_events = true;
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::GameFinalExcluded));
    }

    #[test]
    fn test_final_matched_when_not_excluded() {
        let fx = Fixture::new().with_event(as_of(), EventStatus::Final);
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert!(outcome.is_matched());
    }

    #[test]
    fn test_outside_lookahead() {
        let fx = Fixture::new().with_event(
            Utc.with_ymd_and_hms(2025, 1, 25, 0, 0, 0).unwrap(),
            EventStatus::Scheduled,
        );
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::OutsideLookahead));
    }

    #[test]
    fn test_teams_not_in_source() {
        let mut fx = Fixture::new();
        fx.resolver.0.insert(
            "Obscure vs Smalltown".to_string(),
            ResolvedMatchup::new(
                team("Obscure", None, &["reg.1"]),
                team("Smalltown", Some("9"), &["reg.1"]),
            ),
        );
        let outcome = fx.classify("Obscure vs Smalltown");
        assert_eq!(outcome.reason(), Some(FilterReason::TeamsNotInSource));
    }

    #[test]
    fn test_no_common_league() {
        let mut fx = Fixture::new();
        fx.resolver.0.insert(
            "Lakers vs Chiefs".to_string(),
            ResolvedMatchup::new(
                team("Lakers", Some("13"), &["nba"]),
                team("Chiefs", Some("21"), &["nfl"]),
            ),
        );
        let outcome = fx.classify("Lakers vs Chiefs");
        assert_eq!(outcome.reason(), Some(FilterReason::NoCommonLeague));
    }

    #[test]
    fn test_league_not_enabled_carries_display_name() {
        let mut fx = Fixture::new();
        fx.leagues = GroupLeaguePolicy::new(&["nfl".to_string()]);
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::LeagueNotEnabled));
        assert_eq!(outcome.display_text(7), "League not enabled (NBA)");
    }

    #[test]
    fn test_beach_soccer_short_circuits_before_lookup() {
        let mut fx = Fixture::new();
        fx.resolver.0.insert(
            "Zarcero BS vs River Plate".to_string(),
            ResolvedMatchup::new(
                team("Zarcero BS", Some("55"), &["crc.bs"]),
                team("River Plate", Some("56"), &["crc.bs"]),
            ),
        );
        let outcome = fx.classify("Zarcero BS vs River Plate");
        assert_eq!(outcome.reason(), Some(FilterReason::UnsupportedBeachSoccer));
    }

    #[test]
    fn test_futsal_short_circuits() {
        let mut fx = Fixture::new();
        fx.resolver.0.insert(
            "USAC FP vs Independiente".to_string(),
            ResolvedMatchup::new(
                team("USAC FP", Some("70"), &["gua.fut"]),
                team("Independiente", Some("71"), &["gua.fut"]),
            ),
        );
        let outcome = fx.classify("USAC FP vs Independiente");
        assert_eq!(outcome.reason(), Some(FilterReason::UnsupportedFutsal));
    }

    #[test]
    fn test_lookup_error_degrades_to_no_game_found() {
        let mut fx = Fixture::new().with_event(as_of(), EventStatus::Scheduled);
        fx.schedule.fail_leagues.push("nba".to_string());
        let outcome = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(outcome.reason(), Some(FilterReason::NoGameFound));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let fx = Fixture::new().with_event(as_of(), EventStatus::Scheduled);
        let first = fx.classify("NBA 01: Lakers vs Celtics");
        let second = fx.classify("NBA 01: Lakers vs Celtics");
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_preserves_order() {
        let fx = Fixture::new().with_event(as_of(), EventStatus::Scheduled);
        let streams = vec![
            StreamRecord::new("NBA 01: Lakers vs Celtics"),
            StreamRecord::new("Something vs Unknown"),
        ];
        let ctx = ClassifyContext {
            resolver: &fx.resolver,
            schedule: &fx.schedule,
            leagues: &fx.leagues,
            settings: &fx.settings,
            as_of: as_of(),
        };
        let outcomes = classify_candidates(&ctx, &streams);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_matched());
        assert_eq!(outcomes[1].reason(), Some(FilterReason::TeamsNotParsed));
    }
}
