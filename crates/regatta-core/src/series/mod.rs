//! Series orchestration over a store.
//!
//! `SeriesOrchestrator` runs scoring and seeding against an injected
//! `RegattaStore`: leaderboard recomputes for qualifying and for each final
//! fleet, manual position edits, and generating new rounds.

pub mod edit;
pub mod orchestrator;

pub use edit::{PositionEdit, PositionEditRequest};
pub use orchestrator::{EditOutcome, SeriesOrchestrator};
