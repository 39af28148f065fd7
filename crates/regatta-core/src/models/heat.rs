use std::fmt;

use serde::{Deserialize, Serialize};

/// Every heat name starts with this prefix: "Heat A1", "Heat Gold"
pub const HEAT_PREFIX: &str = "Heat ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatType {
    Qualifying,
    Final,
}

impl fmt::Display for HeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatType::Qualifying => write!(f, "Qualifying"),
            HeatType::Final => write!(f, "Final"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heat {
    pub id: i64,
    #[serde(rename = "eventId")]
    pub event_id: i64,
    #[serde(rename = "heatName")]
    pub heat_name: String,
    #[serde(rename = "heatType")]
    pub heat_type: HeatType,
}

impl Heat {
    /// Heat name without the "Heat " prefix: "A1", "Gold", "Fleet 6"
    pub fn label(&self) -> &str {
        self.heat_name
            .strip_prefix(HEAT_PREFIX)
            .unwrap_or(&self.heat_name)
            .trim()
    }

    /// Fleet label a final heat ranks within. Qualifying heats have none.
    pub fn placement_group(&self) -> Option<&str> {
        match self.heat_type {
            HeatType::Final => Some(self.label()),
            HeatType::Qualifying => None,
        }
    }

    /// Fleet letter and round number for qualifying heats named "Heat <Letter><Round>"
    pub fn round_name(&self) -> Option<HeatName> {
        match self.heat_type {
            HeatType::Qualifying => HeatName::parse(&self.heat_name),
            HeatType::Final => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeatMembership {
    #[serde(rename = "heatId")]
    pub heat_id: i64,
    #[serde(rename = "boatId")]
    pub boat_id: i64,
}

/// A parsed qualifying heat name.
///
/// The letter identifies a fleet across rounds and the round number is the
/// numeric suffix, so "Heat B3" is fleet B in round 3.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeatName {
    pub letter: String,
    pub round: u32,
}

impl HeatName {
    pub fn new(letter: impl Into<String>, round: u32) -> Self {
        Self {
            letter: letter.into(),
            round,
        }
    }

    /// Parse "Heat <Letter><Round>". Returns None for final-style names.
    pub fn parse(name: &str) -> Option<Self> {
        let label = name.strip_prefix(HEAT_PREFIX)?.trim();
        let digits_at = label.find(|c: char| c.is_ascii_digit())?;
        let (letter, suffix) = label.split_at(digits_at);
        if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let round = suffix.parse().ok()?;
        Some(Self::new(letter, round))
    }

    /// The same fleet one round later
    pub fn next(&self) -> Self {
        Self::new(self.letter.clone(), self.round + 1)
    }
}

impl fmt::Display for HeatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", HEAT_PREFIX, self.letter, self.round)
    }
}
