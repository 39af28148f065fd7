//! Data models for regatta entities.
//!
//! This module contains the rows the engine reads from and writes to the
//! store:
//!
//! - `Event`, `Boat`: the regatta and its entries
//! - `Heat`, `HeatMembership`, `HeatName`: groups of boats racing together
//! - `Race`, `Score`: per-race results with resolved points
//! - `LeaderboardEntry`: derived totals and places

pub mod event;
pub mod heat;
pub mod leaderboard;
pub mod score;

pub use event::{Boat, Event};
pub use heat::{Heat, HeatMembership, HeatName, HeatType, HEAT_PREFIX};
pub use leaderboard::LeaderboardEntry;
pub use score::{Race, Score, ScoreStatus};
