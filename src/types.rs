//! Core data types for stream classification.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A raw stream as delivered by the IPTV provider.
///
/// The core never mutates these; they are read-only input for one
/// classification run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub name: String,
    /// Provider-side channel/stream id, when the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl StreamRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    pub fn with_id(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
        }
    }
}

/// Completion state of a scheduled event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    InProgress,
    Final,
}

/// A scheduled event returned by the schedule source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub event_id: String,
    /// Event title as the source names it (e.g. "Lakers @ Celtics").
    pub name: String,
    pub league: String,
    pub kickoff: DateTime<Utc>,
    pub status: EventStatus,
}

impl ScheduledEvent {
    pub fn is_final(&self) -> bool {
        self.status == EventStatus::Final
    }

    /// Calendar date of the kickoff, UTC.
    pub fn date(&self) -> NaiveDate {
        self.kickoff.date_naive()
    }
}

/// A resolved team identity as produced by the team resolver collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamIdentity {
    pub name: String,
    /// Schedule-source id for this team; `None` means the source does not
    /// know the team at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// League codes this team plays in, in resolver order.
    #[serde(default)]
    pub leagues: Vec<String>,
}

impl TeamIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_id: None,
            leagues: Vec::new(),
        }
    }

    pub fn in_source(&self) -> bool {
        self.source_id.is_some()
    }
}

/// Both teams parsed out of one stream name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMatchup {
    pub team_a: TeamIdentity,
    pub team_b: TeamIdentity,
}

impl ResolvedMatchup {
    pub fn new(team_a: TeamIdentity, team_b: TeamIdentity) -> Self {
        Self { team_a, team_b }
    }

    /// Leagues both teams play in, in `team_a`'s league order.
    pub fn common_leagues(&self) -> Vec<&str> {
        self.team_a
            .leagues
            .iter()
            .filter(|l| self.team_b.leagues.iter().any(|m| m.eq_ignore_ascii_case(l)))
            .map(String::as_str)
            .collect()
    }
}

/// Per-channel-group classification settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSettings {
    /// Forward horizon (days) within which an event is eligible for matching.
    pub lookahead_days: u32,
    /// Treat already-final events as excluded rather than matchable.
    pub exclude_final_events: bool,
    /// Stream names must match this pattern to stay a candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_pattern: Option<String>,
    /// Stream names matching this pattern are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_pattern: Option<String>,
    /// League codes enabled for this group; empty means all leagues.
    #[serde(default)]
    pub enabled_leagues: Vec<String>,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            lookahead_days: 7,
            exclude_final_events: false,
            include_pattern: None,
            exclude_pattern: None,
            enabled_leagues: Vec::new(),
        }
    }
}
