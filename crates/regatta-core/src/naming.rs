//! Heat naming across rounds and into the final series.
//!
//! Qualifying heats are named "Heat <Letter><Round>" where the letter follows
//! a fleet from round to round. Final fleets take their names from a fixed
//! ladder.

use std::collections::BTreeMap;

use crate::error::{RegattaError, Result};
use crate::models::{HeatName, HEAT_PREFIX};

/// Final fleet names, best fleet first. Fleets past the ladder are "Fleet N".
pub const FINAL_FLEET_LADDER: [&str; 5] = ["Gold", "Silver", "Bronze", "Copper", "Iron"];

/// Fleet label for the zero-based final fleet `index`
pub fn final_fleet_label(index: usize) -> String {
    FINAL_FLEET_LADDER
        .get(index)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Fleet {}", index + 1))
}

pub fn final_heat_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{}{}", HEAT_PREFIX, final_fleet_label(i)))
        .collect()
}

/// Spreadsheet-style fleet letters: A..Z, AA, AB, ...
pub fn fleet_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

pub fn first_round_names(count: usize) -> Vec<HeatName> {
    (0..count).map(|i| HeatName::new(fleet_letter(i), 1)).collect()
}

/// The latest heat of each fleet letter with the races it has sailed,
/// ordered by letter.
///
/// `heats` holds every qualifying heat name with its race count. All latest
/// heats must have sailed the same number of races, otherwise the round is
/// still in progress and this fails.
pub fn latest_round(heats: &[(HeatName, usize)]) -> Result<Vec<(HeatName, usize)>> {
    let mut latest: BTreeMap<&str, (&HeatName, usize)> = BTreeMap::new();
    for (name, races) in heats {
        let newer = latest
            .get(name.letter.as_str())
            .map_or(true, |(current, _)| name.round > current.round);
        if newer {
            latest.insert(name.letter.as_str(), (name, *races));
        }
    }

    let mut round: Vec<(HeatName, usize)> = latest
        .into_values()
        .map(|(name, races)| (name.clone(), races))
        .collect();
    round.sort_by(|(a, _), (b, _)| {
        a.letter
            .len()
            .cmp(&b.letter.len())
            .then_with(|| a.letter.cmp(&b.letter))
    });

    if let Some((_, expected)) = round.first() {
        if round.iter().any(|(_, races)| races != expected) {
            let counts: Vec<String> = round
                .iter()
                .map(|(name, races)| format!("{}={}", name, races))
                .collect();
            return Err(RegattaError::inconsistent(format!(
                "latest round heats have unequal race counts: {}",
                counts.join(", ")
            )));
        }
    }
    Ok(round)
}

/// Names for the round after the latest one: each letter's highest round
/// plus one. Fails like [`latest_round`] when the round is unfinished.
pub fn next_round_names(heats: &[(HeatName, usize)]) -> Result<Vec<HeatName>> {
    Ok(latest_round(heats)?
        .iter()
        .map(|(name, _)| name.next())
        .collect())
}
