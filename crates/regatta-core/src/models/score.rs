use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub id: i64,
    #[serde(rename = "heatId")]
    pub heat_id: i64,
    /// Ordinal of the race within its round, starting at 1
    #[serde(rename = "raceNumber")]
    pub race_number: u32,
}

/// Finishing status recorded with a score.
///
/// Penalty codes arrive with their points already resolved; the engine never
/// derives points from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScoreStatus {
    #[default]
    #[serde(rename = "FIN")]
    Finished,
    Dnf,
    Dns,
    Dnc,
    Dsq,
    Ocs,
    Ret,
    Bfd,
    Ufd,
}

impl ScoreStatus {
    pub fn is_penalty(&self) -> bool {
        !matches!(self, ScoreStatus::Finished)
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ScoreStatus::Finished => "FIN",
            ScoreStatus::Dnf => "DNF",
            ScoreStatus::Dns => "DNS",
            ScoreStatus::Dnc => "DNC",
            ScoreStatus::Dsq => "DSQ",
            ScoreStatus::Ocs => "OCS",
            ScoreStatus::Ret => "RET",
            ScoreStatus::Bfd => "BFD",
            ScoreStatus::Ufd => "UFD",
        };
        write!(f, "{}", code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    #[serde(rename = "raceId")]
    pub race_id: i64,
    #[serde(rename = "boatId")]
    pub boat_id: i64,
    pub position: u32,
    pub points: Decimal,
    #[serde(default)]
    pub status: ScoreStatus,
}

impl Score {
    /// Low-point scoring: a finisher scores its position
    pub fn with_position(&self, position: u32) -> Self {
        let points = if self.status.is_penalty() {
            self.points
        } else {
            Decimal::from(position)
        };
        Self {
            position,
            points,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(status: ScoreStatus, position: u32, points: i64) -> Score {
        Score {
            id: 1,
            race_id: 1,
            boat_id: 1,
            position,
            points: Decimal::from(points),
            status,
        }
    }

    #[test]
    fn test_status_serde_codes() {
        assert_eq!(serde_json::to_string(&ScoreStatus::Dnf).unwrap(), "\"DNF\"");
        assert_eq!(serde_json::to_string(&ScoreStatus::Finished).unwrap(), "\"FIN\"");
        let parsed: ScoreStatus = serde_json::from_str("\"UFD\"").unwrap();
        assert_eq!(parsed, ScoreStatus::Ufd);
    }

    #[test]
    fn test_with_position_moves_finisher_points() {
        let moved = score(ScoreStatus::Finished, 3, 3).with_position(5);
        assert_eq!(moved.position, 5);
        assert_eq!(moved.points, Decimal::from(5));
    }

    #[test]
    fn test_with_position_keeps_penalty_points() {
        let moved = score(ScoreStatus::Dsq, 9, 11).with_position(8);
        assert_eq!(moved.position, 8);
        assert_eq!(moved.points, Decimal::from(11));
    }
}
