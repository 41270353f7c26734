//! League configuration for supported sports.
//!
//! This module provides:
//! - Static configuration for all supported leagues
//! - The default league-enablement policy driven by channel-group settings

use crate::classify::LeaguePolicy;
use crate::types::GroupSettings;

/// Configuration for a single league.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    /// League code (e.g., "nfl", "epl")
    pub league_code: &'static str,
    /// User-facing league name
    pub display_name: &'static str,
    /// Sport this league belongs to
    pub sport: &'static str,
    /// Schedule-source routing path (sport/league, ESPN convention)
    pub source_path: &'static str,
}

/// Static configuration for all supported leagues.
pub static LEAGUE_CONFIGS: &[LeagueConfig] = &[
    // Football
    LeagueConfig {
        league_code: "nfl",
        display_name: "NFL",
        sport: "football",
        source_path: "football/nfl",
    },
    LeagueConfig {
        league_code: "ncaaf",
        display_name: "NCAA Football",
        sport: "football",
        source_path: "football/college-football",
    },
    // Basketball
    LeagueConfig {
        league_code: "nba",
        display_name: "NBA",
        sport: "basketball",
        source_path: "basketball/nba",
    },
    LeagueConfig {
        league_code: "ncaab",
        display_name: "NCAA Basketball",
        sport: "basketball",
        source_path: "basketball/mens-college-basketball",
    },
    // Hockey
    LeagueConfig {
        league_code: "nhl",
        display_name: "NHL",
        sport: "hockey",
        source_path: "hockey/nhl",
    },
    // Baseball
    LeagueConfig {
        league_code: "mlb",
        display_name: "MLB",
        sport: "baseball",
        source_path: "baseball/mlb",
    },
    // Soccer
    LeagueConfig {
        league_code: "mls",
        display_name: "MLS",
        sport: "soccer",
        source_path: "soccer/usa.1",
    },
    LeagueConfig {
        league_code: "epl",
        display_name: "Premier League",
        sport: "soccer",
        source_path: "soccer/eng.1",
    },
    LeagueConfig {
        league_code: "laliga",
        display_name: "La Liga",
        sport: "soccer",
        source_path: "soccer/esp.1",
    },
    LeagueConfig {
        league_code: "bundesliga",
        display_name: "Bundesliga",
        sport: "soccer",
        source_path: "soccer/ger.1",
    },
    LeagueConfig {
        league_code: "seriea",
        display_name: "Serie A",
        sport: "soccer",
        source_path: "soccer/ita.1",
    },
    LeagueConfig {
        league_code: "ligue1",
        display_name: "Ligue 1",
        sport: "soccer",
        source_path: "soccer/fra.1",
    },
    LeagueConfig {
        league_code: "ucl",
        display_name: "Champions League",
        sport: "soccer",
        source_path: "soccer/uefa.champions",
    },
];

/// Look up one league's configuration by code.
pub fn get_league_config(league_code: &str) -> Option<&'static LeagueConfig> {
    LEAGUE_CONFIGS
        .iter()
        .find(|c| c.league_code.eq_ignore_ascii_case(league_code))
}

/// All supported league codes.
pub fn get_league_codes() -> Vec<&'static str> {
    LEAGUE_CONFIGS.iter().map(|c| c.league_code).collect()
}

/// League-enablement policy for one channel group.
///
/// An empty enabled set means all leagues are enabled.
#[derive(Clone, Debug, Default)]
pub struct GroupLeaguePolicy {
    enabled: Vec<String>,
}

impl GroupLeaguePolicy {
    pub fn new(enabled_leagues: &[String]) -> Self {
        Self {
            enabled: enabled_leagues.to_vec(),
        }
    }

    pub fn from_settings(settings: &GroupSettings) -> Self {
        Self::new(&settings.enabled_leagues)
    }
}

impl LeaguePolicy for GroupLeaguePolicy {
    fn is_enabled(&self, league: &str) -> bool {
        self.enabled.is_empty() || self.enabled.iter().any(|l| l.eq_ignore_ascii_case(league))
    }

    fn display_name(&self, league: &str) -> String {
        match get_league_config(league) {
            Some(config) => config.display_name.to_string(),
            None => league.to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_league_config() {
        let nba = get_league_config("nba").unwrap();
        assert_eq!(nba.display_name, "NBA");
        assert_eq!(nba.source_path, "basketball/nba");

        assert!(get_league_config("NBA").is_some());
        assert!(get_league_config("curling").is_none());
    }

    #[test]
    fn test_league_codes_unique() {
        let mut codes = get_league_codes();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn test_empty_policy_enables_everything() {
        let policy = GroupLeaguePolicy::new(&[]);
        assert!(policy.is_enabled("nba"));
        assert!(policy.is_enabled("epl"));
    }

    #[test]
    fn test_restricted_policy() {
        let policy = GroupLeaguePolicy::new(&["nhl".to_string()]);
        assert!(policy.is_enabled("nhl"));
        assert!(policy.is_enabled("NHL"));
        assert!(!policy.is_enabled("nba"));
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        let policy = GroupLeaguePolicy::default();
        assert_eq!(policy.display_name("epl"), "Premier League");
        assert_eq!(policy.display_name("crc.bs"), "CRC.BS");
    }
}
