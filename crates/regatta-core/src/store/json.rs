use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MemoryStore, RegattaStore, RoundPlan};
use crate::error::StoreResult;
use crate::models::{Boat, Event, Heat, HeatMembership, LeaderboardEntry, Race, Score};

/// Extension used for the temporary file a commit writes before renaming
const TEMP_EXTENSION: &str = "json.tmp";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument<T> {
    data: T,
    saved_at: DateTime<Utc>,
}

/// Store tables persisted to a single JSON document.
///
/// Reads are served from memory. Each write is applied to a copy of the
/// tables, written to a temporary sibling file and renamed over the
/// document; the in-memory tables are replaced only once the rename has
/// succeeded. A failed or interrupted write leaves the previous document.
pub struct JsonStore {
    path: PathBuf,
    data: MemoryStore,
    saved_at: Option<DateTime<Utc>>,
}

impl JsonStore {
    /// Open the document at `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "No store document, starting empty");
            return Ok(Self {
                path,
                data: MemoryStore::default(),
                saved_at: None,
            });
        }

        let contents = std::fs::read_to_string(&path)?;
        let stored: StoredDocument<MemoryStore> = serde_json::from_str(&contents)?;
        debug!(
            path = %path.display(),
            events = stored.data.events.len(),
            scores = stored.data.scores.len(),
            "Loaded store document"
        );
        Ok(Self {
            path,
            data: stored.data,
            saved_at: Some(stored.saved_at),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &MemoryStore {
        &self.data
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.saved_at
    }

    /// Replace all tables at once, e.g. after editing them outside the engine
    pub fn replace_all(&mut self, data: MemoryStore) -> StoreResult<()> {
        self.commit(|tables| {
            *tables = data;
            Ok(())
        })
    }

    fn commit<T>(
        &mut self,
        apply: impl FnOnce(&mut MemoryStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut next = self.data.clone();
        let out = apply(&mut next)?;
        let saved_at = Utc::now();
        self.persist(&next, saved_at)?;
        self.data = next;
        self.saved_at = Some(saved_at);
        Ok(out)
    }

    fn persist(&self, data: &MemoryStore, saved_at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let document = StoredDocument { data, saved_at };
        let contents = serde_json::to_string_pretty(&document)?;
        let temp = self.path.with_extension(TEMP_EXTENSION);
        std::fs::write(&temp, contents)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), "Committed store document");
        Ok(())
    }

    /// When the document was last committed, for report footers:
    /// "2026-05-02 09:30 UTC, 12 min ago"
    pub fn saved_display(&self) -> String {
        let Some(at) = self.saved_at else {
            return "not saved yet".to_string();
        };
        let stamp = at.format("%Y-%m-%d %H:%M UTC");
        match (Utc::now() - at).num_minutes() {
            // Clock skew lands here too
            minutes if minutes < 1 => format!("{}, just now", stamp),
            minutes => format!("{}, {} min ago", stamp, minutes),
        }
    }
}

impl RegattaStore for JsonStore {
    fn event(&self, event_id: i64) -> StoreResult<Option<Event>> {
        self.data.event(event_id)
    }

    fn boats(&self, event_id: i64) -> StoreResult<Vec<Boat>> {
        self.data.boats(event_id)
    }

    fn heats(&self, event_id: i64) -> StoreResult<Vec<Heat>> {
        self.data.heats(event_id)
    }

    fn memberships(&self, event_id: i64) -> StoreResult<Vec<HeatMembership>> {
        self.data.memberships(event_id)
    }

    fn races(&self, event_id: i64) -> StoreResult<Vec<Race>> {
        self.data.races(event_id)
    }

    fn scores(&self, event_id: i64) -> StoreResult<Vec<Score>> {
        self.data.scores(event_id)
    }

    fn race(&self, race_id: i64) -> StoreResult<Option<Race>> {
        self.data.race(race_id)
    }

    fn race_scores(&self, race_id: i64) -> StoreResult<Vec<Score>> {
        self.data.race_scores(race_id)
    }

    fn leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        self.data.leaderboard(event_id)
    }

    fn final_leaderboard(&self, event_id: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        self.data.final_leaderboard(event_id)
    }

    fn replace_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        self.commit(|tables| tables.replace_leaderboard(event_id, entries))
    }

    fn replace_final_leaderboard(
        &mut self,
        event_id: i64,
        entries: Vec<LeaderboardEntry>,
    ) -> StoreResult<()> {
        self.commit(|tables| tables.replace_final_leaderboard(event_id, entries))
    }

    fn write_scores(&mut self, scores: &[Score]) -> StoreResult<()> {
        self.commit(|tables| tables.write_scores(scores))
    }

    fn insert_round(&mut self, event_id: i64, plan: &RoundPlan) -> StoreResult<Vec<Heat>> {
        self.commit(|tables| tables.insert_round(event_id, plan))
    }
}
