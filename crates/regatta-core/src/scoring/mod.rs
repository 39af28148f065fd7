//! Series scoring: discards, totals and tie-broken places.
//!
//! - `aggregate`: one boat's series total after discards
//! - `ranking`: strict places for a whole field, ties resolved by
//!   kept scores then by most recent results

pub mod aggregate;
pub mod ranking;

pub use aggregate::{discard_count, SeriesTotal, DISCARD_THRESHOLDS};
pub use ranking::{rank, BoatSeries, Placing};
