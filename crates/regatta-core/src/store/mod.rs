//! Persistence interface for the scoring engine.
//!
//! Every orchestrator operation reads and writes through a `RegattaStore`
//! handed to it, never through shared global state. Two implementations are
//! provided:
//!
//! - `MemoryStore`: plain tables held in memory, used by tests and embedders
//! - `JsonStore`: the same tables persisted to one JSON document, with every
//!   write committed atomically
//!
//! Each write method applies completely or not at all.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::models::{Boat, Event, Heat, HeatMembership, HeatType, LeaderboardEntry, Race, Score};

/// A heat to create along with the boats that sail in it
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedHeat {
    pub heat_name: String,
    pub heat_type: HeatType,
    pub boat_ids: Vec<i64>,
}

/// The heats and memberships of a new round or final series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundPlan {
    pub heats: Vec<PlannedHeat>,
}

impl RoundPlan {
    /// Group `(heat index, boat id)` assignments under their heat names
    pub fn from_assignments(
        names: &[String],
        heat_type: HeatType,
        assignments: &[(usize, i64)],
    ) -> Self {
        let mut heats: Vec<PlannedHeat> = names
            .iter()
            .map(|name| PlannedHeat {
                heat_name: name.clone(),
                heat_type,
                boat_ids: Vec::new(),
            })
            .collect();
        for &(heat, boat_id) in assignments {
            if let Some(planned) = heats.get_mut(heat) {
                planned.boat_ids.push(boat_id);
            }
        }
        Self { heats }
    }

    pub fn boat_count(&self) -> usize {
        self.heats.iter().map(|h| h.boat_ids.len()).sum()
    }
}

pub trait RegattaStore {
    fn event(&self, event_id: i64) -> StoreResult<Option<Event>>;

    /// Boats entered in the event or sailing in any of its heats, by id
    fn boats(&self, event_id: i64) -> StoreResult<Vec<Boat>>;

    fn heats(&self, event_id: i64) -> StoreResult<Vec<Heat>>;

    fn memberships(&self, event_id: i64) -> StoreResult<Vec<HeatMembership>>;

    /// Races of every heat in the event
    fn races(&self, event_id: i64) -> StoreResult<Vec<Race>>;

    /// Scores of every race in the event
    fn scores(&self, event_id: i64) -> StoreResult<Vec<Score>>;

    fn race(&self, race_id: i64) -> StoreResult<Option<Race>>;

    fn race_scores(&self, race_id: i64) -> StoreResult<Vec<Score>>;

    fn leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>>;

    fn final_leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>>;

    /// Swap the event's qualifying leaderboard for `entries`
    fn replace_leaderboard(&mut self, event_id: i64, entries: Vec<LeaderboardEntry>)
        -> StoreResult<()>;

    /// Swap every placement group of the event's final leaderboard for `entries`
    fn replace_final_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()>;

    /// Overwrite existing score rows, matched by id
    fn write_scores(&mut self, scores: &[Score]) -> StoreResult<()>;

    /// Insert the planned heats and their memberships, returning the new heats
    fn insert_round(&mut self, event_id: i64, plan: &RoundPlan) -> StoreResult<Vec<Heat>>;
}

impl<S: RegattaStore + ?Sized> RegattaStore for &mut S {
    fn event(&self, event_id: i64) -> StoreResult<Option<Event>> {
        (**self).event(event_id)
    }

    fn boats(&self, event_id: i64) -> StoreResult<Vec<Boat>> {
        (**self).boats(event_id)
    }

    fn heats(&self, event_id: i64) -> StoreResult<Vec<Heat>> {
        (**self).heats(event_id)
    }

    fn memberships(&self, event_id: i64) -> StoreResult<Vec<HeatMembership>> {
        (**self).memberships(event_id)
    }

    fn races(&self, event_id: i64) -> StoreResult<Vec<Race>> {
        (**self).races(event_id)
    }

    fn scores(&self, event_id: i64) -> StoreResult<Vec<Score>> {
        (**self).scores(event_id)
    }

    fn race(&self, race_id: i64) -> StoreResult<Option<Race>> {
        (**self).race(race_id)
    }

    fn race_scores(&self, race_id: i64) -> StoreResult<Vec<Score>> {
        (**self).race_scores(race_id)
    }

    fn leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        (**self).leaderboard(event_id)
    }

    fn final_leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        (**self).final_leaderboard(event_id)
    }

    fn replace_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        (**self).replace_leaderboard(event_id, entries)
    }

    fn replace_final_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        (**self).replace_final_leaderboard(event_id, entries)
    }

    fn write_scores(&mut self, scores: &[Score]) -> StoreResult<()> {
        (**self).write_scores(scores)
    }

    fn insert_round(&mut self, event_id: i64, plan: &RoundPlan) -> StoreResult<Vec<Heat>> {
        (**self).insert_round(event_id, plan)
    }
}
