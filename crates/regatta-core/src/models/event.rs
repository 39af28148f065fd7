use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<NaiveDate>,
    /// Boat ids in entry order, used to draw the first round
    #[serde(default)]
    pub entries: Vec<i64>,
}

impl Event {
    pub fn formatted_date(&self) -> String {
        match self.start_date {
            Some(date) => date.format("%b %d, %Y").to_string(),
            None => "TBD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    pub id: i64,
    #[serde(rename = "sailNumber")]
    pub sail_number: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(rename = "sailorId", default)]
    pub sailor_id: Option<i64>,
}

impl Boat {
    /// Sail number prefixed by country code when known: "GBR 1234"
    pub fn display_name(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{} {}", country, self.sail_number),
            _ => self.sail_number.clone(),
        }
    }
}
