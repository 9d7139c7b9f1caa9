//! Generate command - build a lineup from a roster file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), search_lineup(), report_lineup()
//! - Level 3: watch_progress(), sheet formatting
//! - Level 4: formatting utilities

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use rotaplan_core::{
    generate_lineup_with_progress, Formation, GeneratedLineup, ProgressCounter, Roster,
    SearchConfig, SeasonHistory, FIELD_SIZES,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct GenerateArgs {
    /// Roster JSON file
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Players on the field (5, 6, 7, 9 or 11)
    #[arg(long, default_value = "7")]
    pub field_size: usize,

    /// Number of quarters
    #[arg(long, default_value = "4")]
    pub quarters: u8,

    /// Attempt budget for the search
    #[arg(long, default_value = "500")]
    pub attempts: usize,

    /// Season history JSON file (optional scoring bias)
    #[arg(long, value_name = "FILE")]
    pub season: Option<PathBuf>,

    /// Output the lineup as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run generate command
///
/// This function reads like a table of contents:
/// 1. Load roster, season history and formation
/// 2. Search for a lineup (worker thread + progress bar)
/// 3. Report the result
pub fn run(args: GenerateArgs, seed: Option<u64>) -> Result<()> {
    let (roster, season, formation) = load_inputs(&args)?;

    tracing::info!(
        "Generating lineup: {} players, {}, {} quarters",
        roster.available_count(),
        formation.name,
        args.quarters
    );

    let mut config = SearchConfig::default()
        .with_max_attempts(args.attempts)
        .with_quarters(args.quarters);
    config.seed = seed;

    let lineup = search_lineup(&roster, &formation, &season, &config, !args.json)?;

    report_lineup(&lineup, &formation, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load roster, optional season history, and the formation
fn load_inputs(args: &GenerateArgs) -> Result<(Roster, SeasonHistory, Formation)> {
    let roster = Roster::load(&args.roster)
        .with_context(|| format!("Failed to load roster: {}", args.roster.display()))?;

    let season = match &args.season {
        Some(path) => rotaplan_core::load_history(path)
            .with_context(|| format!("Failed to load season history: {}", path.display()))?,
        None => SeasonHistory::default(),
    };

    let formation = Formation::for_field_size(args.field_size).with_context(|| {
        format!(
            "Unsupported field size {}; expected one of {:?}",
            args.field_size, FIELD_SIZES
        )
    })?;

    Ok((roster, season, formation))
}

/// Run the search on a worker thread, polling its attempt counter
fn search_lineup(
    roster: &Roster,
    formation: &Formation,
    season: &SeasonHistory,
    config: &SearchConfig,
    show_progress: bool,
) -> Result<GeneratedLineup> {
    let progress = ProgressCounter::default();

    let result = thread::scope(|scope| {
        let worker = scope
            .spawn(|| generate_lineup_with_progress(roster, formation, season, config, &progress));

        if show_progress {
            watch_progress(&progress, config.max_attempts, || worker.is_finished());
        }

        worker.join().expect("search worker panicked")
    });

    Ok(result?)
}

/// Print the result, as a match sheet or as JSON
fn report_lineup(lineup: &GeneratedLineup, formation: &Formation, args: &GenerateArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(lineup)?);
        return Ok(());
    }

    print_sheet(lineup, formation);
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Poll the attempt counter until the worker finishes
fn watch_progress<F: Fn() -> bool>(progress: &ProgressCounter, budget: usize, finished: F) {
    let bar = ProgressBar::new(budget as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} attempt {pos}/{len}") {
        bar.set_style(style);
    }

    while !finished() {
        bar.set_position(progress.load(Ordering::Relaxed) as u64);
        thread::sleep(Duration::from_millis(25));
    }
    bar.finish_and_clear();
}

/// Print the human-readable match sheet
fn print_sheet(lineup: &GeneratedLineup, formation: &Formation) {
    let date = chrono::Local::now().format("%Y-%m-%d");
    println!(
        "ROTAPLAN match sheet - {} ({}, {} quarters)",
        date,
        formation.name,
        lineup.quarters.len()
    );
    println!();

    let width = formation
        .positions()
        .iter()
        .map(|p| p.len())
        .max()
        .unwrap_or(0)
        .max("Sitting".len());

    for quarter in &lineup.quarters {
        println!("Quarter {}", quarter.quarter);
        for assignment in &quarter.assignments {
            println!("  {:<width$}  {}", assignment.position, assignment.player);
        }
        let sitting = sitting_names(lineup, quarter.quarter);
        if !sitting.is_empty() {
            println!("  {:<width$}  {}", "Sitting", sitting.join(", "));
        }
        println!();
    }

    if !lineup.captains.is_empty() {
        println!("Captains: {}", lineup.captains.join(", "));
    }
    println!("Search: accepted after {} attempts", lineup.attempts);

    if lineup.is_clean() {
        println!("Violations: none");
    } else {
        println!("Violations:");
        for violation in &lineup.violations {
            println!("  - {}", violation);
        }
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Names of the players sitting out a quarter, in sheet order
fn sitting_names(lineup: &GeneratedLineup, quarter: u8) -> Vec<String> {
    lineup
        .sheet
        .entries()
        .iter()
        .filter(|e| e.log.quarters_sitting.contains(&quarter))
        .map(|e| e.name.clone())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
