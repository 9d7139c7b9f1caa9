//! Position assignment - keeper selection and scored placement per quarter

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::formation::{Formation, Role};
use crate::roster::{GameSheet, SheetEntry};
use crate::season::{SeasonHistory, SeasonSummary};
use crate::sitting::SittingSchedule;

// ============================================================================
// SCORE TIERS
// ============================================================================

// Each tier must dominate everything below it: repeating a position beats
// worsening the defense/offense split beats the season bias beats the jitter.
const REPEAT_PENALTY: i64 = 1000;
const IMBALANCE_PENALTY: i64 = 200;
const ROLE_LEAN_BONUS: i64 = 100;
const VARIETY_SCALE: f64 = 200.0;
const NEUTRAL_VARIETY: i64 = 100;
const JITTER_MAX: i64 = 5;

// ============================================================================
// QUARTER LINEUP
// ============================================================================

/// One filled position
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub position: String,
    pub player: String,
}

/// Position -> player assignments for one quarter, in formation order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterLineup {
    pub quarter: u8,
    pub assignments: Vec<Assignment>,
}

impl QuarterLineup {
    /// Who plays `position` this quarter, if anyone
    pub fn player_at(&self, position: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.position == position)
            .map(|a| a.player.as_str())
    }

    /// Who keeps goal this quarter, if anyone
    pub fn keeper(&self) -> Option<&str> {
        self.player_at("Keeper")
    }
}

// ============================================================================
// ASSIGNMENT
// ============================================================================

/// Fill every position for one quarter and update the players' logs.
///
/// The keeper is selected first; the remaining positions are visited in a
/// shuffled order and each takes its best-scoring remaining player. With a
/// short roster, leftover positions stay open rather than failing.
pub fn assign_quarter<R: Rng>(
    sheet: &mut GameSheet,
    schedule: &SittingSchedule,
    formation: &Formation,
    quarter: u8,
    season: &SeasonHistory,
    rng: &mut R,
) -> QuarterLineup {
    let mut pool: Vec<usize> = schedule.playing(quarter, sheet.len());
    let mut filled: Vec<Option<usize>> = vec![None; formation.field_size()];
    let mut slots: Vec<usize> = (0..formation.field_size()).collect();

    // Keeper first: it has its own candidate rules
    if let Some(keeper_slot) = formation.keeper_index() {
        if let Some(keeper) = select_keeper(sheet, &pool, season, rng) {
            let position = &formation.positions()[keeper_slot];
            sheet
                .entry_mut(keeper)
                .log
                .record(quarter, position, Role::Keeper);
            filled[keeper_slot] = Some(keeper);
            pool.retain(|&p| p != keeper);
            slots.retain(|&s| s != keeper_slot);
        }
    }

    // Shuffling the position order varies which position gets first pick
    slots.shuffle(rng);
    for slot in slots {
        if pool.is_empty() {
            break;
        }
        let position = &formation.positions()[slot];
        let role = formation.role_of(slot);

        let mut best = pool[0];
        let mut best_score = i64::MIN;
        for &player in &pool {
            let entry = sheet.entry(player);
            let score = score_candidate(entry, position, role, season.get(&entry.name), rng);
            if score > best_score {
                best_score = score;
                best = player;
            }
        }

        sheet.entry_mut(best).log.record(quarter, position, role);
        filled[slot] = Some(best);
        pool.retain(|&p| p != best);
    }

    let assignments = formation
        .positions()
        .iter()
        .enumerate()
        .filter_map(|(slot, position)| {
            filled[slot].map(|player| Assignment {
                position: position.clone(),
                player: sheet.entry(player).name.clone(),
            })
        })
        .collect();

    QuarterLineup {
        quarter,
        assignments,
    }
}

// ============================================================================
// KEEPER SELECTION
// ============================================================================

/// Pick the keeper for a quarter.
///
/// Opt-out players are excluded unless nobody else is left (the position is
/// never left open). Players who have not kept goal yet this game come
/// first, then the lowest season keeper-quarter count, random among ties.
fn select_keeper<R: Rng>(
    sheet: &GameSheet,
    pool: &[usize],
    season: &SeasonHistory,
    rng: &mut R,
) -> Option<usize> {
    if pool.is_empty() {
        return None;
    }

    let mut eligible: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&p| !sheet.entry(p).no_keeper)
        .collect();
    if eligible.is_empty() {
        tracing::debug!("keeper pool widened to opted-out players");
        eligible = pool.to_vec();
    }

    let fresh: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|&p| sheet.entry(p).log.keeper_quarters.is_empty())
        .collect();
    let candidates = if fresh.is_empty() { eligible } else { fresh };

    let lowest = candidates
        .iter()
        .map(|&p| season_keeper_count(sheet, season, p))
        .min()?;
    let tied: Vec<usize> = candidates
        .into_iter()
        .filter(|&p| season_keeper_count(sheet, season, p) == lowest)
        .collect();

    tied.choose(rng).copied()
}

fn season_keeper_count(sheet: &GameSheet, season: &SeasonHistory, player: usize) -> u32 {
    season
        .get(&sheet.entry(player).name)
        .map(|s| s.keeper_quarters)
        .unwrap_or(0)
}

// ============================================================================
// SCORING
// ============================================================================

/// Score one (player, position) pair for this quarter.
fn score_candidate<R: Rng>(
    entry: &SheetEntry,
    position: &str,
    role: Role,
    season: Option<&SeasonSummary>,
    rng: &mut R,
) -> i64 {
    let log = &entry.log;
    let mut score = 0i64;

    // Repeats are effectively forbidden unless unavoidable
    score -= REPEAT_PENALTY * log.times_played(position) as i64;

    // In-game balance: never worsen the defense/offense split when a
    // balanced alternative exists
    let current = log.imbalance().abs();
    let projected = match role {
        Role::Keeper | Role::Defensive => (log.imbalance() + 1).abs(),
        Role::Offensive => (log.imbalance() - 1).abs(),
    };
    if projected > current {
        score -= IMBALANCE_PENALTY * (projected - current) as i64;
    }

    // Season-role lean: pull players whose history leans offensive toward
    // defense, and the other way around
    if let Some(summary) = season {
        let (defensive, offensive) = summary.role_counts();
        let lean = offensive as i64 - defensive as i64;
        score += match role {
            Role::Keeper | Role::Defensive => ROLE_LEAN_BONUS * lean.signum(),
            Role::Offensive => -(ROLE_LEAN_BONUS * lean.signum()),
        };
    }

    // Season variety: prefer positions the player has seen less of; players
    // without history get a neutral bonus instead of a penalty
    match season {
        Some(summary) if summary.total_quarters() > 0 => {
            let fraction =
                summary.position_count(position) as f64 / summary.total_quarters() as f64;
            score += ((1.0 - fraction) * VARIETY_SCALE).round() as i64;
        }
        _ => score += NEUTRAL_VARIETY,
    }

    score + rng.gen_range(0..=JITTER_MAX)
}

// ============================================================================
// TESTS
// ============================================================================
