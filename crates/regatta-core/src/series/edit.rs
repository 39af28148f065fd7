//! Manual position edits within one race.

use serde::Deserialize;

use crate::error::{RegattaError, Result};
use crate::models::Score;

/// A position edit as it arrives from the data-entry layer, where any
/// field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PositionEditRequest {
    #[serde(rename = "raceId", default)]
    pub race_id: Option<i64>,
    #[serde(rename = "boatId", default)]
    pub boat_id: Option<i64>,
    #[serde(rename = "newPosition", default)]
    pub new_position: Option<u32>,
    #[serde(default)]
    pub shift: bool,
}

/// A complete position edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEdit {
    pub race_id: i64,
    pub boat_id: i64,
    pub new_position: u32,
    pub shift: bool,
}

impl PositionEditRequest {
    pub fn validate(&self) -> Result<PositionEdit> {
        let mut missing = Vec::new();
        if self.race_id.is_none() {
            missing.push("race");
        }
        if self.boat_id.is_none() {
            missing.push("boat");
        }
        if self.new_position.is_none() {
            missing.push("new position");
        }

        match (self.race_id, self.boat_id, self.new_position) {
            (Some(race_id), Some(boat_id), Some(new_position)) => Ok(PositionEdit {
                race_id,
                boat_id,
                new_position,
                shift: self.shift,
            }),
            _ => Err(RegattaError::inconsistent(format!(
                "position edit is missing: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// Move `boat_id` to `new_position` among a race's scores.
///
/// With `shift`, the boats between the old and new position move one place
/// the other way so positions stay contiguous. Finishers' points follow
/// their position; penalty scores keep their points. Returns the race's
/// rows in input order after the move.
pub fn reposition(scores: &[Score], boat_id: i64, new_position: u32, shift: bool) -> Vec<Score> {
    let old = match scores.iter().find(|s| s.boat_id == boat_id) {
        Some(edited) => edited.position,
        None => return scores.to_vec(),
    };

    scores
        .iter()
        .map(|score| {
            if score.boat_id == boat_id {
                return score.with_position(new_position);
            }
            if !shift {
                return score.clone();
            }
            let p = score.position;
            if old > new_position && p >= new_position && p < old {
                score.with_position(p + 1)
            } else if old < new_position && p > old && p <= new_position {
                score.with_position(p - 1)
            } else {
                score.clone()
            }
        })
        .collect()
}

/// Rows of `after` whose position or points differ from the matching row
/// of `before`
pub fn changed_rows(before: &[Score], after: &[Score]) -> Vec<Score> {
    after
        .iter()
        .filter(|new| {
            before
                .iter()
                .find(|old| old.id == new.id)
                .map_or(true, |old| old.position != new.position || old.points != new.points)
        })
        .cloned()
        .collect()
}
