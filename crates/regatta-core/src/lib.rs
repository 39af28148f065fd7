//! Regatta series scoring and fleet seeding.
//!
//! This crate ranks a fleet across a series of races and splits the
//! ranking into heats for the next round or the final series:
//!
//! - `scoring`: discards, series totals and tie-broken places
//! - `seeding`: capacity split with round-robin, serpentine and contiguous orders
//! - `naming`: heat names across rounds and final fleets
//! - `series`: the orchestrator that runs all of the above against a store
//! - `store`: the persistence interface with in-memory and JSON-file backends

pub mod error;
pub mod models;
pub mod naming;
pub mod scoring;
pub mod seeding;
pub mod series;
pub mod store;

pub use error::{RegattaError, Result, StoreError};
pub use seeding::{Draw, FleetSeeder};
pub use series::{EditOutcome, PositionEditRequest, SeriesOrchestrator};
pub use store::{JsonStore, MemoryStore, RegattaStore};
