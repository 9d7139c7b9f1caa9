//! Lineup validation - pure rule checks over a finished game sheet

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::roster::GameSheet;

/// The rule a violation is reported against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    DoubleKeeper,
    ConsecutiveSitting,
    ExcessSitting,
    MissingRole,
    RoleImbalance,
    RepeatedPosition,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RuleKind::DoubleKeeper => "kept goal more than once",
            RuleKind::ConsecutiveSitting => "sits out two quarters in a row",
            RuleKind::ExcessSitting => "sits out more than two quarters",
            RuleKind::MissingRole => "played only one side of the field",
            RuleKind::RoleImbalance => "defense/offense split off by more than one",
            RuleKind::RepeatedPosition => "repeated a position",
        };
        f.write_str(text)
    }
}

/// One broken rule for one player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub player: String,
    pub rule: RuleKind,
    pub detail: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.player, self.rule, self.detail)
    }
}

/// Check every rule against the finished sheet.
///
/// Pure: same sheet in, same ordered list out. An empty list means a fully
/// valid lineup; an unsatisfiable constraint is reported here, never raised
/// as an error.
pub fn validate_sheet(sheet: &GameSheet) -> Vec<Violation> {
    let mut violations = Vec::new();

    for entry in sheet.entries() {
        let log = &entry.log;
        let push = |violations: &mut Vec<Violation>, rule, detail| {
            violations.push(Violation {
                player: entry.name.clone(),
                rule,
                detail,
            });
        };

        if log.keeper_quarters.len() > 1 {
            push(
                &mut violations,
                RuleKind::DoubleKeeper,
                format!("keeper in quarters {:?}", log.keeper_quarters),
            );
        }

        let mut sits = log.quarters_sitting.clone();
        sits.sort_unstable();
        for pair in sits.windows(2) {
            if pair[1] - pair[0] == 1 {
                push(
                    &mut violations,
                    RuleKind::ConsecutiveSitting,
                    format!("quarters {} and {}", pair[0], pair[1]),
                );
            }
        }

        if sits.len() > 2 {
            push(
                &mut violations,
                RuleKind::ExcessSitting,
                format!("sits {} quarters", sits.len()),
            );
        }

        if !log.quarters_played.is_empty() {
            if log.defensive_quarters == 0 || log.offensive_quarters == 0 {
                push(
                    &mut violations,
                    RuleKind::MissingRole,
                    format!(
                        "{} defensive, {} offensive",
                        log.defensive_quarters, log.offensive_quarters
                    ),
                );
            }
            if log.imbalance().abs() > 1 {
                push(
                    &mut violations,
                    RuleKind::RoleImbalance,
                    format!(
                        "{} defensive vs {} offensive",
                        log.defensive_quarters, log.offensive_quarters
                    ),
                );
            }
        }

        let mut counted: Vec<(&str, usize)> = Vec::new();
        for played in &log.positions_played {
            match counted.iter_mut().find(|(p, _)| *p == played.position) {
                Some((_, count)) => *count += 1,
                None => counted.push((played.position.as_str(), 1)),
            }
        }
        for (position, count) in counted {
            if count > 1 {
                push(
                    &mut violations,
                    RuleKind::RepeatedPosition,
                    format!("{} played {} times", position, count),
                );
            }
        }
    }

    violations
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::Role;
    use crate::roster::{GameSheet, Player, Roster};

    fn sheet_of(names: &[&str]) -> GameSheet {
        GameSheet::from_roster(&Roster::new(
            names.iter().map(|n| Player::new(n)).collect(),
        ))
    }

    #[test]
    fn test_clean_sheet_has_no_violations() {
        let mut sheet = sheet_of(&["A"]);
        let log = &mut sheet.entry_mut(0).log;
        log.record(1, "Left Back", Role::Defensive);
        log.record(2, "Left Forward", Role::Offensive);
        log.record(4, "Keeper", Role::Keeper);
        log.quarters_sitting.push(3);

        assert!(validate_sheet(&sheet).is_empty());
    }

    #[test]
    fn test_double_keeper_reported() {
        let mut sheet = sheet_of(&["A"]);
        let log = &mut sheet.entry_mut(0).log;
        log.record(1, "Keeper", Role::Keeper);
        log.record(2, "Left Forward", Role::Offensive);
        log.record(3, "Keeper", Role::Keeper);
        log.record(4, "Right Forward", Role::Offensive);

        let violations = validate_sheet(&sheet);
        assert!(violations.iter().any(|v| v.rule == RuleKind::DoubleKeeper));
        // The repeated "Keeper" position is flagged independently
        assert!(violations.iter().any(|v| v.rule == RuleKind::RepeatedPosition));
    }

    #[test]
    fn test_consecutive_and_excess_sitting() {
        let mut sheet = sheet_of(&["A"]);
        sheet.entry_mut(0).log.quarters_sitting = vec![1, 2, 4];

        let violations = validate_sheet(&sheet);
        assert_eq!(
            violations
                .iter()
                .filter(|v| v.rule == RuleKind::ConsecutiveSitting)
                .count(),
            1
        );
        assert!(violations.iter().any(|v| v.rule == RuleKind::ExcessSitting));
    }

    #[test]
    fn test_missing_role_and_imbalance() {
        let mut sheet = sheet_of(&["A", "B"]);
        // A: three defensive quarters, no offense
        let log_a = &mut sheet.entry_mut(0).log;
        log_a.record(1, "Left Back", Role::Defensive);
        log_a.record(2, "Center Back", Role::Defensive);
        log_a.record(3, "Right Back", Role::Defensive);
        // B: never played at all - no violation
        sheet.entry_mut(1).log.quarters_sitting = vec![1, 3];

        let violations = validate_sheet(&sheet);
        assert!(violations
            .iter()
            .any(|v| v.rule == RuleKind::MissingRole && v.player == "A"));
        assert!(violations
            .iter()
            .any(|v| v.rule == RuleKind::RoleImbalance && v.player == "A"));
        assert!(!violations.iter().any(|v| v.player == "B"));
    }

    #[test]
    fn test_sitting_only_player_not_flagged_for_roles() {
        let mut sheet = sheet_of(&["A"]);
        sheet.entry_mut(0).log.quarters_sitting = vec![2];
        assert!(validate_sheet(&sheet).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let mut sheet = sheet_of(&["A", "B"]);
        sheet.entry_mut(0).log.quarters_sitting = vec![2, 3];
        let log_b = &mut sheet.entry_mut(1).log;
        log_b.record(1, "Left Back", Role::Defensive);
        log_b.record(2, "Left Back", Role::Defensive);

        let first = validate_sheet(&sheet);
        let second = validate_sheet(&sheet);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
