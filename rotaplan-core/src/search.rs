//! Search controller - bounded retry loop around schedule + assign + validate

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::assign::{assign_quarter, QuarterLineup};
use crate::captain::select_captains;
use crate::error::GenerateError;
use crate::formation::Formation;
use crate::roster::{GameSheet, Roster};
use crate::season::SeasonHistory;
use crate::sitting::schedule_sitting;
use crate::validate::{validate_sheet, Violation};

/// Attempt budget used when none is configured
pub const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Quarters per game in the reference rules
pub const DEFAULT_QUARTERS: u8 = 4;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search configuration
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Retry budget for the generate/validate loop
    pub max_attempts: usize,
    /// Game segments to schedule
    pub quarters: u8,
    /// Random seed for reproducibility (None = entropy)
    pub seed: Option<u64>,
    /// Attempts evaluated per batch when the `parallel` feature is enabled
    pub batch_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            quarters: DEFAULT_QUARTERS,
            seed: None,
            batch_size: 32,
        }
    }
}

impl SearchConfig {
    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the number of quarters
    pub fn with_quarters(mut self, quarters: u8) -> Self {
        self.quarters = quarters;
        self
    }
}

/// Attempt counter a caller may poll while a search runs on a worker
pub type ProgressCounter = Arc<AtomicUsize>;

// ============================================================================
// RESULT
// ============================================================================

/// The accepted lineup plus everything downstream consumers need
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedLineup {
    /// One lineup per quarter, 1..=Q
    pub quarters: Vec<QuarterLineup>,
    /// Residual violations; empty means every rule was satisfied
    pub violations: Vec<Violation>,
    /// Up to two captains, rotated by season history
    pub captains: Vec<String>,
    /// Final per-player accumulators for the stats/export collaborators
    pub sheet: GameSheet,
    /// Attempts consumed before accepting
    pub attempts: usize,
}

impl GeneratedLineup {
    /// True when every rule was satisfied
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn quarter(&self, quarter: u8) -> Option<&QuarterLineup> {
        self.quarters.iter().find(|q| q.quarter == quarter)
    }
}

/// One finished attempt
struct Candidate {
    quarters: Vec<QuarterLineup>,
    sheet: GameSheet,
    violations: Vec<Violation>,
}

// ============================================================================
// SEARCH LOOP
// ============================================================================

/// Generate a lineup.
///
/// Checks the hard preconditions, then retries schedule + assign + validate
/// within the attempt budget. The first violation-free candidate is
/// accepted; when the budget runs out, the best candidate seen wins (fewest
/// violations, earliest attempt on ties).
pub fn generate_lineup(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    config: &SearchConfig,
) -> Result<GeneratedLineup, GenerateError> {
    let progress = ProgressCounter::default();
    generate_lineup_with_progress(roster, formation, season, config, &progress)
}

/// Like [`generate_lineup`], reporting attempts into `progress` so a caller
/// on the other side of a worker boundary can poll completion.
pub fn generate_lineup_with_progress(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    config: &SearchConfig,
    progress: &ProgressCounter,
) -> Result<GeneratedLineup, GenerateError> {
    check_preconditions(roster, formation, config)?;

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let max_attempts = config.max_attempts.max(1);

    let (candidate, attempts) =
        run_search(roster, formation, season, config, base_seed, max_attempts, progress);

    // Captain rotation is independent of the accepted lineup
    let mut captain_rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(max_attempts as u64));
    let captains = select_captains(&candidate.sheet, season, &mut captain_rng);

    tracing::info!(
        attempts,
        violations = candidate.violations.len(),
        "lineup search finished"
    );

    Ok(GeneratedLineup {
        quarters: candidate.quarters,
        violations: candidate.violations,
        captains,
        sheet: candidate.sheet,
        attempts,
    })
}

fn check_preconditions(
    roster: &Roster,
    formation: &Formation,
    config: &SearchConfig,
) -> Result<(), GenerateError> {
    roster.validate()?;
    if config.quarters == 0 {
        return Err(GenerateError::ZeroQuarters);
    }
    let available = roster.available_count();
    if available < formation.field_size() {
        return Err(GenerateError::NotEnoughPlayers {
            available,
            field_size: formation.field_size(),
        });
    }
    Ok(())
}

/// One full attempt: fresh sheet, sitting schedule, per-quarter assignment,
/// validation. Deterministic for a given seed.
fn run_attempt(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    quarters: u8,
    seed: u64,
) -> Candidate {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut sheet = GameSheet::from_roster(roster);

    let schedule = schedule_sitting(&mut sheet, formation.field_size(), quarters, &mut rng);
    let lineups = (1..=quarters)
        .map(|q| assign_quarter(&mut sheet, &schedule, formation, q, season, &mut rng))
        .collect();
    let violations = validate_sheet(&sheet);

    Candidate {
        quarters: lineups,
        sheet,
        violations,
    }
}

fn better(candidate: &Candidate, best: &Option<Candidate>) -> bool {
    best.as_ref()
        .map_or(true, |b| candidate.violations.len() < b.violations.len())
}

#[cfg(not(feature = "parallel"))]
fn run_search(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    config: &SearchConfig,
    base_seed: u64,
    max_attempts: usize,
    progress: &ProgressCounter,
) -> (Candidate, usize) {
    let mut best: Option<Candidate> = None;

    for attempt in 0..max_attempts {
        let seed = base_seed.wrapping_add(attempt as u64);
        let candidate = run_attempt(roster, formation, season, config.quarters, seed);
        progress.store(attempt + 1, Ordering::Relaxed);

        if candidate.violations.is_empty() {
            return (candidate, attempt + 1);
        }
        if better(&candidate, &best) {
            best = Some(candidate);
        }
    }

    (best.expect("at least one attempt runs"), max_attempts)
}

/// Batched variant: attempts keep their per-index seeds and are scanned in
/// index order, so the outcome matches the sequential search exactly.
#[cfg(feature = "parallel")]
fn run_search(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    config: &SearchConfig,
    base_seed: u64,
    max_attempts: usize,
    progress: &ProgressCounter,
) -> (Candidate, usize) {
    let batch_size = config.batch_size.max(1);
    let mut best: Option<Candidate> = None;
    let mut done = 0;

    while done < max_attempts {
        let size = batch_size.min(max_attempts - done);
        let candidates: Vec<Candidate> = (done..done + size)
            .into_par_iter()
            .map(|attempt| {
                let seed = base_seed.wrapping_add(attempt as u64);
                run_attempt(roster, formation, season, config.quarters, seed)
            })
            .collect();

        for (offset, candidate) in candidates.into_iter().enumerate() {
            if candidate.violations.is_empty() {
                let attempts = done + offset + 1;
                progress.store(attempts, Ordering::Relaxed);
                return (candidate, attempts);
            }
            if better(&candidate, &best) {
                best = Some(candidate);
            }
        }

        done += size;
        progress.store(done, Ordering::Relaxed);
    }

    (best.expect("at least one attempt runs"), max_attempts)
}

// ============================================================================
// TESTS
// ============================================================================
