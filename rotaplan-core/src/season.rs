//! Season history - read-only cross-game aggregates
//!
//! Supplied by the season-stats collaborator and used only as a soft scoring
//! bias. Players without history score neutrally; this core never mutates a
//! summary.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::formation::{classify, Role};

/// Prior-game aggregates for one player
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeasonSummary {
    #[serde(default)]
    pub quarters_sat: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub keeper_quarters: u32,
    #[serde(default)]
    pub captain_games: u32,
    /// Position name -> quarters played there across saved games
    #[serde(default)]
    pub position_counts: FxHashMap<String, u32>,
}

impl SeasonSummary {
    pub fn position_count(&self, position: &str) -> u32 {
        self.position_counts.get(position).copied().unwrap_or(0)
    }

    /// Total position-quarters recorded for this player
    pub fn total_quarters(&self) -> u32 {
        self.position_counts.values().sum()
    }

    /// (defensive, offensive) season quarters, by position classification
    pub fn role_counts(&self) -> (u32, u32) {
        let mut defensive = 0;
        let mut offensive = 0;
        for (position, count) in &self.position_counts {
            match classify(position) {
                Role::Keeper | Role::Defensive => defensive += count,
                Role::Offensive => offensive += count,
            }
        }
        (defensive, offensive)
    }
}

/// Season summaries keyed by player name. Missing players score neutrally.
pub type SeasonHistory = FxHashMap<String, SeasonSummary>;

/// Load a season history from a JSON file
pub fn load_history(path: &Path) -> anyhow::Result<SeasonHistory> {
    let content = std::fs::read_to_string(path)?;
    let history: SeasonHistory = serde_json::from_str(&content)?;
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(pairs: &[(&str, u32)]) -> SeasonSummary {
        SeasonSummary {
            position_counts: pairs
                .iter()
                .map(|(p, c)| (p.to_string(), *c))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_role_counts() {
        let s = summary(&[("Keeper", 2), ("Left Back", 3), ("Left Forward", 4)]);
        let (defensive, offensive) = s.role_counts();
        assert_eq!(defensive, 5);
        assert_eq!(offensive, 4);
    }

    #[test]
    fn test_position_count_missing() {
        let s = summary(&[("Left Back", 3)]);
        assert_eq!(s.position_count("Right Back"), 0);
        assert_eq!(s.total_quarters(), 3);
    }

    #[test]
    fn test_empty_summary_is_neutral() {
        let s = SeasonSummary::default();
        assert_eq!(s.total_quarters(), 0);
        assert_eq!(s.role_counts(), (0, 0));
        assert_eq!(s.captain_games, 0);
    }

    #[test]
    fn test_history_json_partial_fields() {
        // Files from the stats collaborator may omit unknown-zero fields
        let json = r#"{"Anna": {"keeper_quarters": 3}, "Bram": {}}"#;
        let history: SeasonHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history["Anna"].keeper_quarters, 3);
        assert_eq!(history["Bram"].keeper_quarters, 0);
    }
}
