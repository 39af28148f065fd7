use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::edit::{changed_rows, reposition, PositionEdit, PositionEditRequest};
use crate::error::{RegattaError, Result};
use crate::models::{Event, Heat, HeatMembership, HeatName, HeatType, LeaderboardEntry, Race, Score};
use crate::naming::{final_heat_names, first_round_names, latest_round};
use crate::scoring::{rank, BoatSeries, Placing};
use crate::seeding::{Draw, FleetSeeder};
use crate::store::{RegattaStore, RoundPlan};

/// Result of a position edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// Rows actually written, edited boat included
    pub written: Vec<Score>,
    /// The recomputed leaderboard the race counts towards
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Everything one operation reads about an event, loaded once
struct EventSnapshot {
    event: Event,
    heats: Vec<Heat>,
    memberships: Vec<HeatMembership>,
    races: Vec<Race>,
    scores: Vec<Score>,
}

impl EventSnapshot {
    fn heats_of(&self, heat_type: HeatType) -> impl Iterator<Item = &Heat> {
        self.heats.iter().filter(move |h| h.heat_type == heat_type)
    }

    fn race_count(&self, heat_id: i64) -> usize {
        self.races.iter().filter(|r| r.heat_id == heat_id).count()
    }

    /// Qualifying heat names with their race counts
    fn qualifying_rounds(&self) -> Result<Vec<(HeatName, usize)>> {
        self.heats_of(HeatType::Qualifying)
            .map(|heat| {
                heat.round_name()
                    .map(|name| (name, self.race_count(heat.id)))
                    .ok_or_else(|| {
                        RegattaError::inconsistent(format!(
                            "heat name {} does not follow Heat <Letter><Round>",
                            heat.heat_name
                        ))
                    })
            })
            .collect()
    }

    /// Ranking field for the given heats: their members and anyone scored
    /// in their races, each with one result slot per race in race order.
    ///
    /// Boats come out in `seed_order` first, then by id; fully tied boats
    /// keep that order when ranked.
    fn field(
        &self,
        heat_ids: &HashSet<i64>,
        extra_boats: &[i64],
        seed_order: &[i64],
    ) -> Vec<BoatSeries> {
        let round_of: HashMap<i64, u32> = self
            .heats
            .iter()
            .map(|h| (h.id, h.round_name().map_or(0, |n| n.round)))
            .collect();

        let mut races: Vec<&Race> = self
            .races
            .iter()
            .filter(|r| heat_ids.contains(&r.heat_id))
            .collect();
        races.sort_by_key(|r| (round_of.get(&r.heat_id).copied().unwrap_or(0), r.race_number, r.id));
        let slot_of: HashMap<i64, usize> = races.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        let mut boats: BTreeSet<i64> = self
            .memberships
            .iter()
            .filter(|m| heat_ids.contains(&m.heat_id))
            .map(|m| m.boat_id)
            .collect();
        boats.extend(extra_boats.iter().copied());

        let mut results: HashMap<i64, Vec<Option<Decimal>>> = HashMap::new();
        for score in &self.scores {
            if let Some(&slot) = slot_of.get(&score.race_id) {
                boats.insert(score.boat_id);
                results
                    .entry(score.boat_id)
                    .or_insert_with(|| vec![None; races.len()])[slot] = Some(score.points);
            }
        }

        let seeded: HashMap<i64, usize> = seed_order
            .iter()
            .enumerate()
            .map(|(i, &boat)| (boat, i))
            .collect();
        let mut ordered: Vec<i64> = boats.into_iter().collect();
        ordered.sort_by_key(|boat| (seeded.get(boat).copied().unwrap_or(usize::MAX), *boat));

        ordered
            .into_iter()
            .map(|boat_id| {
                let raw = results
                    .remove(&boat_id)
                    .unwrap_or_else(|| vec![None; races.len()]);
                BoatSeries::new(boat_id, raw)
            })
            .collect()
    }
}

/// Runs scoring and seeding for one store.
///
/// Operations take `&mut self`, so edits against the same orchestrator are
/// serialized.
pub struct SeriesOrchestrator<S> {
    store: S,
}

impl<S: RegattaStore> SeriesOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn snapshot(&self, event_id: i64) -> Result<EventSnapshot> {
        let event = self
            .store
            .event(event_id)?
            .ok_or_else(|| RegattaError::not_found("event", event_id))?;
        Ok(EventSnapshot {
            event,
            heats: self.store.heats(event_id)?,
            memberships: self.store.memberships(event_id)?,
            races: self.store.races(event_id)?,
            scores: self.store.scores(event_id)?,
        })
    }

    /// Rebuild the event-wide leaderboard from qualifying results
    pub fn recompute_leaderboard(&mut self, event_id: i64) -> Result<Vec<LeaderboardEntry>> {
        let snapshot = self.snapshot(event_id)?;
        let heat_ids: HashSet<i64> = snapshot
            .heats_of(HeatType::Qualifying)
            .map(|h| h.id)
            .collect();
        let field = snapshot.field(&heat_ids, &snapshot.event.entries, &[]);
        let placings = rank(&field);

        let computed_at = Utc::now();
        let entries: Vec<LeaderboardEntry> = placings
            .iter()
            .map(|p| leaderboard_entry(event_id, None, p, computed_at))
            .collect();

        self.store.replace_leaderboard(event_id, entries.clone())?;
        info!(
            event_id,
            boats = entries.len(),
            races = snapshot.races.len(),
            "Recomputed leaderboard"
        );
        Ok(entries)
    }

    /// Rebuild the final-series leaderboard, ranking each fleet on its own
    pub fn recompute_final_leaderboard(&mut self, event_id: i64) -> Result<Vec<LeaderboardEntry>> {
        let snapshot = self.snapshot(event_id)?;

        let mut groups: BTreeMap<&str, HashSet<i64>> = BTreeMap::new();
        for heat in snapshot.heats_of(HeatType::Final) {
            if let Some(group) = heat.placement_group() {
                groups.entry(group).or_default().insert(heat.id);
            }
        }

        // Fleets were sliced from the qualifying ranking; it orders boats the
        // final races cannot separate, including everyone before the first race
        let qualifying_order = ranked_boats(&self.store.leaderboard(event_id)?);

        let computed_at = Utc::now();
        let mut entries = Vec::new();
        for (group, heat_ids) in &groups {
            let placings = rank(&snapshot.field(heat_ids, &[], &qualifying_order));
            debug!(event_id, group = %group, boats = placings.len(), "Ranked final fleet");
            entries.extend(
                placings
                    .iter()
                    .map(|p| leaderboard_entry(event_id, Some(*group), p, computed_at)),
            );
        }

        self.store.replace_final_leaderboard(event_id, entries.clone())?;
        info!(
            event_id,
            fleets = groups.len(),
            boats = entries.len(),
            "Recomputed final leaderboard"
        );
        Ok(entries)
    }

    /// Apply an edit request from the data-entry layer
    pub fn apply_edit(
        &mut self,
        event_id: i64,
        request: &PositionEditRequest,
    ) -> Result<EditOutcome> {
        let PositionEdit {
            race_id,
            boat_id,
            new_position,
            shift,
        } = request.validate()?;
        self.edit_position(event_id, race_id, boat_id, new_position, shift)
    }

    /// Overwrite a boat's finishing position in one race, optionally
    /// shifting the boats in between, then recompute the leaderboard the
    /// race counts towards.
    pub fn edit_position(
        &mut self,
        event_id: i64,
        race_id: i64,
        boat_id: i64,
        new_position: u32,
        shift: bool,
    ) -> Result<EditOutcome> {
        if self.store.event(event_id)?.is_none() {
            return Err(RegattaError::not_found("event", event_id));
        }
        let race = self
            .store
            .race(race_id)?
            .ok_or_else(|| RegattaError::not_found("race", race_id))?;
        let heat = self
            .store
            .heats(event_id)?
            .into_iter()
            .find(|h| h.id == race.heat_id)
            .ok_or_else(|| {
                RegattaError::NotFound(format!("race {} in event {}", race_id, event_id))
            })?;

        let before = self.store.race_scores(race_id)?;
        if !before.iter().any(|s| s.boat_id == boat_id) {
            return Err(RegattaError::NotFound(format!(
                "score for boat {} in race {}",
                boat_id, race_id
            )));
        }
        if new_position == 0 {
            return Err(RegattaError::inconsistent("positions start at 1"));
        }
        if shift && new_position as usize > before.len() {
            return Err(RegattaError::inconsistent(format!(
                "position {} is beyond the {} boats scored in race {}",
                new_position,
                before.len(),
                race_id
            )));
        }

        let after = reposition(&before, boat_id, new_position, shift);
        let written = changed_rows(&before, &after);
        if written.is_empty() {
            debug!(event_id, race_id, boat_id, "Position edit changes nothing");
            let leaderboard = match heat.heat_type {
                HeatType::Qualifying => self.store.leaderboard(event_id)?,
                HeatType::Final => self.store.final_leaderboard(event_id)?,
            };
            return Ok(EditOutcome {
                written,
                leaderboard,
            });
        }

        self.store.write_scores(&written)?;
        info!(
            event_id,
            race_id,
            boat_id,
            new_position,
            shift,
            rows = written.len(),
            "Applied position edit"
        );

        let leaderboard = match heat.heat_type {
            HeatType::Qualifying => self.recompute_leaderboard(event_id)?,
            HeatType::Final => self.recompute_final_leaderboard(event_id)?,
        };
        Ok(EditOutcome {
            written,
            leaderboard,
        })
    }

    /// Split the event's entries into the first qualifying round
    pub fn seed_first_round(
        &mut self,
        event_id: i64,
        heat_count: usize,
        draw: Draw,
    ) -> Result<Vec<Heat>> {
        let snapshot = self.snapshot(event_id)?;
        if snapshot.heats_of(HeatType::Qualifying).next().is_some() {
            return Err(RegattaError::inconsistent(format!(
                "event {} already has a qualifying round",
                event_id
            )));
        }
        let order = draw.apply(&snapshot.event.entries);
        check_field_size(order.len(), heat_count)?;

        let names: Vec<String> = first_round_names(heat_count)
            .iter()
            .map(|n| n.to_string())
            .collect();
        let slots: Vec<usize> = (0..names.len()).collect();
        let assignments = FleetSeeder::new(&slots)?.round_robin(&order);
        let plan = RoundPlan::from_assignments(&names, HeatType::Qualifying, &assignments);

        let heats = self.store.insert_round(event_id, &plan)?;
        info!(event_id, heats = heats.len(), boats = plan.boat_count(), ?draw, "Seeded first round");
        Ok(heats)
    }

    /// Re-seed the current ranking into the next qualifying round
    pub fn seed_next_round(&mut self, event_id: i64) -> Result<Vec<Heat>> {
        let snapshot = self.snapshot(event_id)?;
        if snapshot.heats_of(HeatType::Final).next().is_some() {
            return Err(RegattaError::inconsistent(format!(
                "event {} has started its final series",
                event_id
            )));
        }
        let latest = finished_latest_round(&snapshot)?;
        let names: Vec<String> = latest.iter().map(|(n, _)| n.next().to_string()).collect();

        let ranked = ranked_boats(&self.recompute_leaderboard(event_id)?);
        check_field_size(ranked.len(), names.len())?;

        let slots: Vec<usize> = (0..names.len()).collect();
        let assignments = FleetSeeder::new(&slots)?.serpentine(&ranked);
        let plan = RoundPlan::from_assignments(&names, HeatType::Qualifying, &assignments);

        let heats = self.store.insert_round(event_id, &plan)?;
        info!(event_id, heats = heats.len(), boats = plan.boat_count(), "Seeded next round");
        Ok(heats)
    }

    /// Split the qualifying ranking into ability-ordered final fleets
    pub fn start_final_series(&mut self, event_id: i64) -> Result<Vec<Heat>> {
        let snapshot = self.snapshot(event_id)?;
        if snapshot.heats_of(HeatType::Final).next().is_some() {
            return Err(RegattaError::inconsistent(format!(
                "event {} has already started its final series",
                event_id
            )));
        }
        let latest = finished_latest_round(&snapshot)?;
        let names = final_heat_names(latest.len());

        let ranked = ranked_boats(&self.recompute_leaderboard(event_id)?);
        check_field_size(ranked.len(), names.len())?;

        let slots: Vec<usize> = (0..names.len()).collect();
        let assignments = FleetSeeder::new(&slots)?.contiguous(&ranked);
        let plan = RoundPlan::from_assignments(&names, HeatType::Final, &assignments);

        let heats = self.store.insert_round(event_id, &plan)?;
        info!(event_id, fleets = heats.len(), boats = plan.boat_count(), "Started final series");

        self.recompute_final_leaderboard(event_id)?;
        Ok(heats)
    }
}

fn leaderboard_entry(
    event_id: i64,
    group: Option<&str>,
    placing: &Placing,
    computed_at: chrono::DateTime<Utc>,
) -> LeaderboardEntry {
    LeaderboardEntry {
        event_id,
        boat_id: placing.boat_id,
        placement_group: group.map(str::to_string),
        total_points: placing.total,
        place: placing.place,
        races_sailed: placing.races_sailed as u32,
        has_raced: placing.has_raced,
        computed_at,
    }
}

/// Boat ids in place order
fn ranked_boats(entries: &[LeaderboardEntry]) -> Vec<i64> {
    let mut by_place: Vec<&LeaderboardEntry> = entries.iter().collect();
    by_place.sort_by_key(|e| e.place);
    by_place.iter().map(|e| e.boat_id).collect()
}

/// The latest qualifying round, which must exist and have sailed at least
/// one race in every heat
fn finished_latest_round(snapshot: &EventSnapshot) -> Result<Vec<(HeatName, usize)>> {
    let latest = latest_round(&snapshot.qualifying_rounds()?)?;
    match latest.first().map(|(_, races)| *races) {
        None => Err(RegattaError::inconsistent(format!(
            "event {} has no qualifying round; seed the first round",
            snapshot.event.id
        ))),
        Some(0) => Err(RegattaError::inconsistent(format!(
            "event {} has not sailed any races in its latest round",
            snapshot.event.id
        ))),
        Some(_) => Ok(latest),
    }
}

fn check_field_size(boats: usize, heats: usize) -> Result<()> {
    if heats == 0 {
        return Err(RegattaError::inconsistent("at least one heat is required"));
    }
    if boats < heats {
        warn!(boats, heats, "Not enough boats to fill every heat");
        return Err(RegattaError::inconsistent(format!(
            "{} boats cannot fill {} heats",
            boats, heats
        )));
    }
    Ok(())
}
