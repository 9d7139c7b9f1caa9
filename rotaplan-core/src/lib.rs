//! ROTAPLAN Core - fair-rotation lineup engine
//!
//! This crate provides the scheduling core for ROTAPLAN:
//! - Roster model with per-game tracking accumulators
//! - Sitting rotation under fairness constraints
//! - Scored position assignment with season-aware bias
//! - Rule validation over finished lineups
//! - Bounded retry search keeping the best candidate
//! - Captain rotation from season history

pub mod error;
pub mod formation;
pub mod roster;
pub mod season;
pub mod sitting;
pub mod assign;
pub mod validate;
pub mod captain;
pub mod search;

// Re-exports for convenient access
pub use assign::{Assignment, QuarterLineup};
pub use captain::{select_captains, CAPTAIN_COUNT};
pub use error::GenerateError;
pub use formation::{classify, Formation, Role, FIELD_SIZES};
pub use roster::{GameLog, GameSheet, Player, PlayerStatus, Roster, SheetEntry};
pub use search::{
    generate_lineup, generate_lineup_with_progress, GeneratedLineup, ProgressCounter,
    SearchConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_QUARTERS,
};
pub use season::{load_history, SeasonHistory, SeasonSummary};
pub use sitting::{schedule_sitting, SittingSchedule};
pub use validate::{validate_sheet, RuleKind, Violation};
