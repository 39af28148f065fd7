use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A derived leaderboard row.
///
/// Qualifying rows are keyed by (boat, event); final-series rows add the
/// placement group the boat ranks within.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "eventId")]
    pub event_id: i64,
    #[serde(rename = "boatId")]
    pub boat_id: i64,
    #[serde(rename = "placementGroup", default, skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<String>,
    #[serde(rename = "totalPoints")]
    pub total_points: Decimal,
    pub place: u32,
    #[serde(rename = "racesSailed")]
    pub races_sailed: u32,
    #[serde(rename = "hasRaced")]
    pub has_raced: bool,
    #[serde(rename = "computedAt")]
    pub computed_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// The fields that must match across recomputes of identical scores
    pub fn standing(&self) -> (i64, Option<&str>, Decimal, u32) {
        (
            self.boat_id,
            self.placement_group.as_deref(),
            self.total_points,
            self.place,
        )
    }
}
