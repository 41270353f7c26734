//! Stream filtering for event-based EPG.
//!
//! Partitions a provider's stream list into candidate game streams and
//! rejected streams, using positive detection: a stream must contain a
//! matchup indicator (vs, @, at) to be counted at all. This keeps the
//! match rate honest - "10/12 matched" over game streams only, not
//! "10/20" inflated by placeholders and non-game channels.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::detect::{has_game_indicator, is_boxing_mma};
use crate::reasons::FilterReason;
use crate::types::{GroupSettings, StreamRecord};

/// A rejected stream tagged with why it was dropped.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FilteredStream {
    pub stream: StreamRecord,
    pub reason: FilterReason,
}

/// Result of one filter pass over a stream batch.
///
/// Always sums exactly:
/// `game_streams.len() + filtered_streams.len() == input.len()`, and the
/// per-reason counters sum to `filtered_streams.len()`.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct FilterResult {
    /// Streams that passed filtering and are eligible for schedule lookup.
    pub game_streams: Vec<StreamRecord>,
    /// Streams that were filtered out, each tagged with its reason.
    pub filtered_streams: Vec<FilteredStream>,
    /// Count of streams without a matchup indicator.
    pub filtered_no_indicator: usize,
    /// Count of streams carrying boxing/MMA card terminology.
    pub filtered_unsupported: usize,
    /// Count of streams that failed the user include pattern.
    pub filtered_include_regex: usize,
    /// Count of streams matching the user exclusion pattern.
    pub filtered_exclude_regex: usize,
}

impl FilterResult {
    /// Total rejections across all reasons.
    pub fn rejected_total(&self) -> usize {
        self.filtered_no_indicator
            + self.filtered_unsupported
            + self.filtered_include_regex
            + self.filtered_exclude_regex
    }

    /// Total streams seen by the filter pass.
    pub fn input_total(&self) -> usize {
        self.game_streams.len() + self.filtered_streams.len()
    }
}

/// Compiled user patterns for one filter pass.
///
/// Patterns are compiled once per batch, not once per stream. A pattern
/// that fails to compile is logged and disabled for the run; classification
/// proceeds without it rather than failing the whole batch.
#[derive(Debug, Default)]
pub struct StreamFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl StreamFilter {
    pub fn new(include_pattern: Option<&str>, exclude_pattern: Option<&str>) -> Self {
        Self {
            include: compile_user_pattern("include", include_pattern),
            exclude: compile_user_pattern("exclude", exclude_pattern),
        }
    }

    pub fn from_settings(settings: &GroupSettings) -> Self {
        Self::new(
            settings.include_pattern.as_deref(),
            settings.exclude_pattern.as_deref(),
        )
    }

    /// Partition a stream batch into candidates and tagged rejections.
    ///
    /// Per stream, in order, first match wins:
    /// 1. no matchup indicator
    /// 2. boxing/MMA card terminology
    /// 3. include pattern present and not matched
    /// 4. exclusion pattern matched
    /// 5. otherwise candidate
    pub fn partition(&self, streams: &[StreamRecord]) -> FilterResult {
        let mut result = FilterResult::default();

        for stream in streams {
            match self.reject_reason(&stream.name) {
                None => result.game_streams.push(stream.clone()),
                Some(reason) => {
                    match reason {
                        FilterReason::NoGameIndicator => result.filtered_no_indicator += 1,
                        FilterReason::UnsupportedBoxingMma => result.filtered_unsupported += 1,
                        FilterReason::IncludeRegexNotMatched => {
                            result.filtered_include_regex += 1
                        }
                        FilterReason::ExcludeRegexMatched => {
                            result.filtered_exclude_regex += 1
                        }
                        other => unreachable!("filter stage produced {:?}", other),
                    }
                    result.filtered_streams.push(FilteredStream {
                        stream: stream.clone(),
                        reason,
                    });
                }
            }
        }

        // Partition completeness is a logic invariant, not a data error.
        assert_eq!(
            result.game_streams.len() + result.filtered_streams.len(),
            streams.len(),
            "filter partition lost or duplicated streams"
        );
        assert_eq!(
            result.rejected_total(),
            result.filtered_streams.len(),
            "per-reason counts disagree with rejection list"
        );

        result
    }

    fn reject_reason(&self, name: &str) -> Option<FilterReason> {
        if !has_game_indicator(name) {
            return Some(FilterReason::NoGameIndicator);
        }
        if is_boxing_mma(name) {
            return Some(FilterReason::UnsupportedBoxingMma);
        }
        if let Some(include) = &self.include {
            if !include.is_match(name) {
                return Some(FilterReason::IncludeRegexNotMatched);
            }
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(name) {
                return Some(FilterReason::ExcludeRegexMatched);
            }
        }
        None
    }
}

fn compile_user_pattern(label: &str, pattern: Option<&str>) -> Option<Regex> {
    let pattern = pattern?.trim();
    if pattern.is_empty() {
        return None;
    }
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(
                "invalid {} pattern {:?}, continuing without it: {}",
                label, pattern, err
            );
            None
        }
    }
}

/// Filter streams to only those that appear to be game streams.
///
/// Two-layer filtering: the built-in matchup-indicator check, then an
/// optional user exclusion regex.
pub fn filter_game_streams(
    streams: &[StreamRecord],
    exclude_regex: Option<&str>,
) -> FilterResult {
    StreamFilter::new(None, exclude_regex).partition(streams)
}
