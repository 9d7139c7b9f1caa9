//! Roster model - players, per-game accumulators, and the per-attempt sheet

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GenerateError;
use crate::formation::Role;

// ============================================================================
// PLAYERS
// ============================================================================

/// Availability of a player for this game
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Available,
    Injured,
    Absent,
}

/// A rostered player with their static per-game preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default)]
    pub must_rest: bool,
    #[serde(default)]
    pub no_keeper: bool,
    #[serde(default)]
    pub status: PlayerStatus,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            number: None,
            must_rest: false,
            no_keeper: false,
            status: PlayerStatus::Available,
        }
    }

    pub fn with_number(mut self, number: u8) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_must_rest(mut self) -> Self {
        self.must_rest = true;
        self
    }

    pub fn with_no_keeper(mut self) -> Self {
        self.no_keeper = true;
        self
    }

    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    /// Only available players take part in a game
    pub fn is_available(&self) -> bool {
        self.status == PlayerStatus::Available
    }
}

/// The full team roster for one game
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    pub players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Players taking part in this game
    pub fn available(&self) -> Vec<&Player> {
        self.players.iter().filter(|p| p.is_available()).collect()
    }

    pub fn available_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_available()).count()
    }

    /// Check name and shirt-number uniqueness
    pub fn validate(&self) -> Result<(), GenerateError> {
        let mut names = FxHashSet::default();
        let mut numbers = FxHashSet::default();

        for player in &self.players {
            if !names.insert(player.name.as_str()) {
                return Err(GenerateError::DuplicateName(player.name.clone()));
            }
            if let Some(number) = player.number {
                if !numbers.insert(number) {
                    return Err(GenerateError::DuplicateNumber(number));
                }
            }
        }

        Ok(())
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let roster: Roster = serde_json::from_str(&content)?;
        Ok(roster)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// PER-GAME ACCUMULATORS
// ============================================================================

/// One position played in one quarter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedPosition {
    pub quarter: u8,
    pub position: String,
}

/// Per-game accumulators for one player, rebuilt for every search attempt
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameLog {
    pub quarters_played: Vec<u8>,
    pub quarters_sitting: Vec<u8>,
    pub positions_played: Vec<PlayedPosition>,
    pub keeper_quarters: Vec<u8>,
    pub defensive_quarters: u8,
    pub offensive_quarters: u8,
}

impl GameLog {
    /// Quarter in which this player kept goal, if any
    pub fn keeper_quarter(&self) -> Option<u8> {
        self.keeper_quarters.first().copied()
    }

    /// Times this exact position was already played this game
    pub fn times_played(&self, position: &str) -> usize {
        self.positions_played
            .iter()
            .filter(|p| p.position == position)
            .count()
    }

    /// Defensive minus offensive quarters
    pub fn imbalance(&self) -> i32 {
        self.defensive_quarters as i32 - self.offensive_quarters as i32
    }

    /// Record one assigned quarter. Keeping goal counts as a defensive
    /// quarter.
    pub fn record(&mut self, quarter: u8, position: &str, role: Role) {
        self.quarters_played.push(quarter);
        self.positions_played.push(PlayedPosition {
            quarter,
            position: position.to_string(),
        });
        match role {
            Role::Keeper => {
                self.keeper_quarters.push(quarter);
                self.defensive_quarters += 1;
            }
            Role::Defensive => self.defensive_quarters += 1,
            Role::Offensive => self.offensive_quarters += 1,
        }
    }
}

// ============================================================================
// GAME SHEET (copy-on-attempt snapshot)
// ============================================================================

/// One player's slot on the game sheet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    pub must_rest: bool,
    pub no_keeper: bool,
    pub log: GameLog,
}

/// Snapshot of the available players plus their per-game accumulators.
///
/// Built fresh for every search attempt; nothing leaks between attempts, and
/// a discarded attempt leaves no trace on the roster.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSheet {
    entries: Vec<SheetEntry>,
}

impl GameSheet {
    pub fn from_roster(roster: &Roster) -> Self {
        let entries = roster
            .players
            .iter()
            .filter(|p| p.is_available())
            .map(|p| SheetEntry {
                name: p.name.clone(),
                number: p.number,
                must_rest: p.must_rest,
                no_keeper: p.no_keeper,
                log: GameLog::default(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> &SheetEntry {
        &self.entries[index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut SheetEntry {
        &mut self.entries[index]
    }

    pub fn entries(&self) -> &[SheetEntry] {
        &self.entries
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_roster() -> Roster {
        Roster::new(vec![
            Player::new("Anna").with_number(1),
            Player::new("Bram").with_number(2).with_must_rest(),
            Player::new("Cato").with_status(PlayerStatus::Injured),
            Player::new("Daan").with_no_keeper(),
        ])
    }

    #[test]
    fn test_available_filters_status() {
        let roster = small_roster();
        assert_eq!(roster.players.len(), 4);
        assert_eq!(roster.available_count(), 3);
        assert!(roster.available().iter().all(|p| p.name != "Cato"));
    }

    #[test]
    fn test_validate_duplicate_name() {
        let roster = Roster::new(vec![Player::new("Anna"), Player::new("Anna")]);
        assert_eq!(
            roster.validate().unwrap_err(),
            GenerateError::DuplicateName("Anna".to_string())
        );
    }

    #[test]
    fn test_validate_duplicate_number() {
        let roster = Roster::new(vec![
            Player::new("Anna").with_number(7),
            Player::new("Bram").with_number(7),
        ]);
        assert_eq!(
            roster.validate().unwrap_err(),
            GenerateError::DuplicateNumber(7)
        );
    }

    #[test]
    fn test_game_log_record() {
        let mut log = GameLog::default();
        log.record(1, "Keeper", Role::Keeper);
        log.record(2, "Left Back", Role::Defensive);
        log.record(3, "Left Forward", Role::Offensive);

        assert_eq!(log.quarters_played, vec![1, 2, 3]);
        assert_eq!(log.keeper_quarter(), Some(1));
        // Keeping goal counts toward the defensive side
        assert_eq!(log.defensive_quarters, 2);
        assert_eq!(log.offensive_quarters, 1);
        assert_eq!(log.imbalance(), 1);
        assert_eq!(log.times_played("Left Back"), 1);
        assert_eq!(log.times_played("Right Back"), 0);
    }

    #[test]
    fn test_sheet_only_has_available_players() {
        let sheet = GameSheet::from_roster(&small_roster());
        assert_eq!(sheet.len(), 3);
        assert!(sheet.index_of("Cato").is_none());
        assert_eq!(sheet.index_of("Daan"), Some(2));
        assert!(sheet.entry(2).no_keeper);
    }

    #[test]
    fn test_roster_json_round_trip() {
        let roster = small_roster();
        let json = serde_json::to_string(&roster).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.players.len(), roster.players.len());
        assert_eq!(back.players[1].name, "Bram");
        assert!(back.players[1].must_rest);
    }

    #[test]
    fn test_player_json_defaults() {
        // A minimal roster file only names the players
        let back: Player = serde_json::from_str(r#"{"name": "Anna"}"#).unwrap();
        assert!(back.is_available());
        assert!(!back.must_rest);
        assert!(!back.no_keeper);
        assert_eq!(back.number, None);
    }
}
