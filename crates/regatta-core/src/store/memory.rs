use std::collections::{BTreeSet, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RegattaStore, RoundPlan};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    Boat, Event, Heat, HeatMembership, HeatType, LeaderboardEntry, Race, Score, ScoreStatus,
};

/// In-memory tables. Also the document layout persisted by `JsonStore`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub boats: Vec<Boat>,
    #[serde(default)]
    pub heats: Vec<Heat>,
    #[serde(default)]
    pub memberships: Vec<HeatMembership>,
    #[serde(default)]
    pub races: Vec<Race>,
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(rename = "finalLeaderboard", default)]
    pub final_leaderboard: Vec<LeaderboardEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn heat_ids(&self, event_id: i64) -> HashSet<i64> {
        self.heats
            .iter()
            .filter(|h| h.event_id == event_id)
            .map(|h| h.id)
            .collect()
    }

    fn race_ids(&self, event_id: i64) -> HashSet<i64> {
        let heats = self.heat_ids(event_id);
        self.races
            .iter()
            .filter(|r| heats.contains(&r.heat_id))
            .map(|r| r.id)
            .collect()
    }

    // ===== Result entry =====
    //
    // Row creation normally happens in the data-entry layer; these keep
    // fixtures and tooling short.

    pub fn add_event(&mut self, name: &str) -> i64 {
        let id = self.events.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.events.push(Event {
            id,
            name: name.to_string(),
            venue: None,
            start_date: None,
            entries: Vec::new(),
        });
        id
    }

    /// Create a boat and append it to the event's entry list
    pub fn add_entry(&mut self, event_id: i64, sail_number: &str) -> i64 {
        let id = self.boats.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        self.boats.push(Boat {
            id,
            sail_number: sail_number.to_string(),
            country: None,
            model: None,
            sailor_id: None,
        });
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.entries.push(id);
        }
        id
    }

    pub fn add_heat(&mut self, event_id: i64, heat_name: &str, heat_type: HeatType) -> i64 {
        let id = self.heats.iter().map(|h| h.id).max().unwrap_or(0) + 1;
        self.heats.push(Heat {
            id,
            event_id,
            heat_name: heat_name.to_string(),
            heat_type,
        });
        id
    }

    pub fn add_member(&mut self, heat_id: i64, boat_id: i64) {
        self.memberships.push(HeatMembership { heat_id, boat_id });
    }

    pub fn add_race(&mut self, heat_id: i64, race_number: u32) -> i64 {
        let id = self.races.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        self.races.push(Race {
            id,
            heat_id,
            race_number,
        });
        id
    }

    pub fn add_score(
        &mut self,
        race_id: i64,
        boat_id: i64,
        position: u32,
        points: Decimal,
        status: ScoreStatus,
    ) -> i64 {
        let id = self.scores.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.scores.push(Score {
            id,
            race_id,
            boat_id,
            position,
            points,
            status,
        });
        id
    }

    /// Add a race to `heat_id` and record finishers in order, scoring low-point
    pub fn add_finish_order(&mut self, heat_id: i64, race_number: u32, boat_ids: &[i64]) -> i64 {
        let race_id = self.add_race(heat_id, race_number);
        for (i, &boat_id) in boat_ids.iter().enumerate() {
            let position = i as u32 + 1;
            self.add_score(
                race_id,
                boat_id,
                position,
                Decimal::from(position),
                ScoreStatus::Finished,
            );
        }
        race_id
    }
}

impl RegattaStore for MemoryStore {
    fn event(&self, event_id: i64) -> StoreResult<Option<Event>> {
        Ok(self.events.iter().find(|e| e.id == event_id).cloned())
    }

    fn boats(&self, event_id: i64) -> StoreResult<Vec<Boat>> {
        let heats = self.heat_ids(event_id);
        let mut ids: BTreeSet<i64> = self
            .memberships
            .iter()
            .filter(|m| heats.contains(&m.heat_id))
            .map(|m| m.boat_id)
            .collect();
        if let Some(event) = self.events.iter().find(|e| e.id == event_id) {
            ids.extend(event.entries.iter().copied());
        }

        let by_id: HashMap<i64, &Boat> = self.boats.iter().map(|b| (b.id, b)).collect();
        ids.into_iter()
            .map(|id| {
                by_id
                    .get(&id)
                    .map(|b| (*b).clone())
                    .ok_or_else(|| StoreError::Integrity(format!("boat {} has no row", id)))
            })
            .collect()
    }

    fn heats(&self, event_id: i64) -> StoreResult<Vec<Heat>> {
        Ok(self
            .heats
            .iter()
            .filter(|h| h.event_id == event_id)
            .cloned()
            .collect())
    }

    fn memberships(&self, event_id: i64) -> StoreResult<Vec<HeatMembership>> {
        let heats = self.heat_ids(event_id);
        Ok(self
            .memberships
            .iter()
            .filter(|m| heats.contains(&m.heat_id))
            .copied()
            .collect())
    }

    fn races(&self, event_id: i64) -> StoreResult<Vec<Race>> {
        let heats = self.heat_ids(event_id);
        Ok(self
            .races
            .iter()
            .filter(|r| heats.contains(&r.heat_id))
            .cloned()
            .collect())
    }

    fn scores(&self, event_id: i64) -> StoreResult<Vec<Score>> {
        let races = self.race_ids(event_id);
        Ok(self
            .scores
            .iter()
            .filter(|s| races.contains(&s.race_id))
            .cloned()
            .collect())
    }

    fn race(&self, race_id: i64) -> StoreResult<Option<Race>> {
        Ok(self.races.iter().find(|r| r.id == race_id).cloned())
    }

    fn race_scores(&self, race_id: i64) -> StoreResult<Vec<Score>> {
        Ok(self
            .scores
            .iter()
            .filter(|s| s.race_id == race_id)
            .cloned()
            .collect())
    }

    fn leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        Ok(self
            .leaderboard
            .iter()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect())
    }

    fn final_leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        Ok(self
            .final_leaderboard
            .iter()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect())
    }

    fn replace_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        check_event_rows(event_id, &entries)?;
        self.leaderboard.retain(|e| e.event_id != event_id);
        self.leaderboard.extend(entries);
        Ok(())
    }

    fn replace_final_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        check_event_rows(event_id, &entries)?;
        if let Some(entry) = entries.iter().find(|e| e.placement_group.is_none()) {
            return Err(StoreError::Integrity(format!(
                "final leaderboard row for boat {} has no placement group",
                entry.boat_id
            )));
        }
        self.final_leaderboard.retain(|e| e.event_id != event_id);
        self.final_leaderboard.extend(entries);
        Ok(())
    }

    fn write_scores(&mut self, scores: &[Score]) -> StoreResult<()> {
        let mut slots = Vec::with_capacity(scores.len());
        for score in scores {
            let slot = self
                .scores
                .iter()
                .position(|s| s.id == score.id)
                .ok_or_else(|| StoreError::Integrity(format!("score {} has no row", score.id)))?;
            let existing = &self.scores[slot];
            if existing.race_id != score.race_id || existing.boat_id != score.boat_id {
                return Err(StoreError::Integrity(format!(
                    "score {} cannot move to another race or boat",
                    score.id
                )));
            }
            slots.push(slot);
        }

        for (slot, score) in slots.into_iter().zip(scores) {
            self.scores[slot] = score.clone();
        }
        Ok(())
    }

    fn insert_round(&mut self, event_id: i64, plan: &RoundPlan) -> StoreResult<Vec<Heat>> {
        if !self.events.iter().any(|e| e.id == event_id) {
            return Err(StoreError::Integrity(format!("event {} has no row", event_id)));
        }
        let existing: HashSet<&str> = self
            .heats
            .iter()
            .filter(|h| h.event_id == event_id)
            .map(|h| h.heat_name.as_str())
            .collect();
        let mut planned_names = HashSet::new();
        if let Some(dup) = plan.heats.iter().find(|h| {
            existing.contains(h.heat_name.as_str()) || !planned_names.insert(h.heat_name.as_str())
        }) {
            return Err(StoreError::Integrity(format!(
                "heat name {} is already taken in event {}",
                dup.heat_name, event_id
            )));
        }

        let mut created = Vec::with_capacity(plan.heats.len());
        for planned in &plan.heats {
            let heat_id = self.add_heat(event_id, &planned.heat_name, planned.heat_type);
            for &boat_id in &planned.boat_ids {
                self.add_member(heat_id, boat_id);
            }
            if let Some(heat) = self.heats.last() {
                created.push(heat.clone());
            }
        }
        Ok(created)
    }
}

fn check_event_rows(event_id: i64, entries: &[LeaderboardEntry]) -> StoreResult<()> {
    match entries.iter().find(|e| e.event_id != event_id) {
        Some(stray) => Err(StoreError::Integrity(format!(
            "leaderboard row for event {} passed to event {}",
            stray.event_id, event_id
        ))),
        None => Ok(()),
    }
}
