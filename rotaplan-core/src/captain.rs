//! Captain rotation - biased toward players with the fewest captain games

use rand::seq::SliceRandom;
use rand::Rng;

use crate::roster::GameSheet;
use crate::season::SeasonHistory;

/// Captains picked per game
pub const CAPTAIN_COUNT: usize = 2;

/// Pick up to two captains from the available players.
///
/// The lowest season captain-count tier is served first, shuffled within a
/// tier; when a tier cannot fill both slots the next tier tops up. Runs
/// after a lineup is accepted and never affects its violations.
pub fn select_captains<R: Rng>(
    sheet: &GameSheet,
    season: &SeasonHistory,
    rng: &mut R,
) -> Vec<String> {
    let mut tiers: Vec<(u32, Vec<&str>)> = Vec::new();
    for entry in sheet.entries() {
        let count = season
            .get(&entry.name)
            .map(|s| s.captain_games)
            .unwrap_or(0);
        match tiers.iter_mut().find(|(c, _)| *c == count) {
            Some((_, names)) => names.push(entry.name.as_str()),
            None => tiers.push((count, vec![entry.name.as_str()])),
        }
    }
    tiers.sort_by_key(|(count, _)| *count);

    let mut captains = Vec::new();
    for (_, mut names) in tiers {
        names.shuffle(rng);
        for name in names {
            if captains.len() == CAPTAIN_COUNT {
                return captains;
            }
            captains.push(name.to_string());
        }
    }

    captains
}
