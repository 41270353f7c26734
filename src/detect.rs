//! Stream name detectors: matchup indicators and unsupported-sport
//! heuristics.
//!
//! All patterns are compiled once per process behind `OnceLock` and the
//! predicates are total: any input, including empty strings, yields a
//! plain boolean.
//!
//! The sport heuristics are heuristics, not guarantees. A false negative
//! just means the stream continues through normal schedule lookup and is
//! declined there, so the patterns stay conservative (anchored and
//! word-bounded) to avoid discarding a legitimate match.

use regex::Regex;
use std::sync::OnceLock;

static GAME_INDICATOR: OnceLock<Regex> = OnceLock::new();
static BOXING_MMA: OnceLock<Regex> = OnceLock::new();
static BEACH_SOCCER: OnceLock<Regex> = OnceLock::new();
static FUTSAL: OnceLock<Regex> = OnceLock::new();

fn game_indicator() -> &'static Regex {
    // vs, vs., at (word), v (word), or a literal @ anywhere.
    GAME_INDICATOR.get_or_init(|| {
        Regex::new(r"(?i)\b(vs\.?|at|v)\b|@").expect("static game indicator pattern")
    })
}

fn boxing_mma() -> &'static Regex {
    BOXING_MMA.get_or_init(|| {
        Regex::new(r"(?i)\b(main\s*card|under\s*card|early\s+prelims|preliminary\s+card|prelims)\b")
            .expect("static boxing/MMA pattern")
    })
}

fn beach_soccer() -> &'static Regex {
    // Team name ends with BS or BSC, optionally before a closing paren.
    BEACH_SOCCER.get_or_init(|| {
        Regex::new(r"(?i)\b(bsc|bs)\)?\s*$").expect("static beach soccer pattern")
    })
}

fn futsal() -> &'static Regex {
    // Team name ends with FP, or starts with FP as a leading word.
    FUTSAL.get_or_init(|| {
        Regex::new(r"(?i)\bfp\)?\s*$|^\s*fp\b").expect("static futsal pattern")
    })
}

/// Check if a stream name contains a matchup indicator.
///
/// Word-boundary matching: substrings like "Vsetin" must not match "vs".
///
/// ```
/// use teamarr_core::detect::has_game_indicator;
///
/// assert!(has_game_indicator("NBA 01: Lakers vs Celtics"));
/// assert!(has_game_indicator("NFL 02: Chiefs @ Ravens"));
/// assert!(!has_game_indicator("RedZone"));
/// ```
pub fn has_game_indicator(stream_name: &str) -> bool {
    game_indicator().is_match(stream_name)
}

/// Check stream text for boxing/MMA card terminology (main card,
/// undercard, prelims, preliminary card, early prelims).
pub fn is_boxing_mma(text: &str) -> bool {
    boxing_mma().is_match(text)
}

/// Check either team name for the beach-soccer suffix convention
/// ("... BS" or "... BSC", optionally before a trailing paren).
pub fn is_beach_soccer(team_a: &str, team_b: &str) -> bool {
    beach_soccer().is_match(team_a) || beach_soccer().is_match(team_b)
}

/// Check either team name for the futsal convention ("... FP" suffix or
/// "FP ..." leading word).
pub fn is_futsal(team_a: &str, team_b: &str) -> bool {
    futsal().is_match(team_a) || futsal().is_match(team_b)
}
