//! Raw and cleaned order records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::config::CleaningRules;

/// Column names every source file must carry, after lower-casing.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "delivery_person_id",
    "delivery_person_age",
    "delivery_person_ratings",
    "restaurant_latitude",
    "restaurant_longitude",
    "delivery_location_latitude",
    "delivery_location_longitude",
    "order_date",
    "weatherconditions",
    "road_traffic_density",
    "vehicle_condition",
    "type_of_order",
    "multiple_deliveries",
    "festival",
    "city",
    "time_taken(min)",
];

/// A single row as read from the source file. Nothing is trimmed or parsed yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub id: String,
    pub delivery_person_id: String,
    pub delivery_person_age: String,
    pub delivery_person_ratings: String,
    pub restaurant_latitude: String,
    pub restaurant_longitude: String,
    pub delivery_location_latitude: String,
    pub delivery_location_longitude: String,
    pub order_date: String,
    pub weatherconditions: String,
    pub road_traffic_density: String,
    pub vehicle_condition: String,
    pub type_of_order: String,
    pub multiple_deliveries: String,
    pub festival: String,
    pub city: String,
    #[serde(rename = "time_taken(min)")]
    pub time_taken: String,
}

/// Road traffic density. Declared in label order so grouped output sorts
/// the same way the labels do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Traffic {
    High,
    Jam,
    Low,
    Medium,
}

impl Traffic {
    pub const ALL: [Traffic; 4] = [Traffic::Jam, Traffic::High, Traffic::Low, Traffic::Medium];

    pub fn label(&self) -> &'static str {
        match self {
            Traffic::High => "High",
            Traffic::Jam => "Jam",
            Traffic::Low => "Low",
            Traffic::Medium => "Medium",
        }
    }
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Traffic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "High" => Ok(Traffic::High),
            "Jam" => Ok(Traffic::Jam),
            "Low" => Ok(Traffic::Low),
            "Medium" => Ok(Traffic::Medium),
            other => Err(format!("unknown traffic density: {other}")),
        }
    }
}

/// Weather condition as labelled in the source (`conditions Sunny`, ...).
///
/// Labels outside the six known conditions are kept verbatim in `Other`;
/// the source carries `conditions NaN` rows that survive cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weather {
    Cloudy,
    Fog,
    Sandstorms,
    Stormy,
    Sunny,
    Windy,
    Other(String),
}

const WEATHER_PREFIX: &str = "conditions ";

impl Weather {
    pub const NAMED: [Weather; 6] = [
        Weather::Sunny,
        Weather::Stormy,
        Weather::Sandstorms,
        Weather::Cloudy,
        Weather::Fog,
        Weather::Windy,
    ];
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weather::Cloudy => "Cloudy",
            Weather::Fog => "Fog",
            Weather::Sandstorms => "Sandstorms",
            Weather::Stormy => "Stormy",
            Weather::Sunny => "Sunny",
            Weather::Windy => "Windy",
            Weather::Other(raw) => return f.write_str(raw),
        };
        write!(f, "{WEATHER_PREFIX}{name}")
    }
}

impl FromStr for Weather {
    type Err = String;

    /// Accepts both the prefixed source label and the bare condition name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix(WEATHER_PREFIX).unwrap_or(trimmed);
        Ok(match name {
            "Cloudy" => Weather::Cloudy,
            "Fog" => Weather::Fog,
            "Sandstorms" => Weather::Sandstorms,
            "Stormy" => Weather::Stormy,
            "Sunny" => Weather::Sunny,
            "Windy" => Weather::Windy,
            _ => Weather::Other(trimmed.to_string()),
        })
    }
}

impl Serialize for Weather {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Festival {
    No,
    Yes,
}

impl fmt::Display for Festival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Festival::No => "No",
            Festival::Yes => "Yes",
        })
    }
}

impl FromStr for Festival {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Festival::Yes),
            "no" => Ok(Festival::No),
            other => Err(format!("unknown festival flag: {other}")),
        }
    }
}

/// A cleaned, typed delivery order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub delivery_person_id: String,
    pub delivery_person_age: u32,
    pub delivery_person_rating: Option<f64>,
    pub restaurant_latitude: f64,
    pub restaurant_longitude: f64,
    pub delivery_location_latitude: f64,
    pub delivery_location_longitude: f64,
    pub order_date: NaiveDate,
    pub weather: Weather,
    pub traffic: Traffic,
    pub vehicle_condition: i64,
    pub order_type: String,
    pub multiple_deliveries: u32,
    pub festival: Festival,
    pub city: String,
    pub time_taken_min: u32,
}

impl Order {
    /// Renders the order back into source form so it can be written out and
    /// cleaned again with the same rules.
    pub fn to_raw(&self, rules: &CleaningRules) -> RawOrder {
        RawOrder {
            id: self.id.clone(),
            delivery_person_id: self.delivery_person_id.clone(),
            delivery_person_age: self.delivery_person_age.to_string(),
            delivery_person_ratings: self
                .delivery_person_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
            restaurant_latitude: self.restaurant_latitude.to_string(),
            restaurant_longitude: self.restaurant_longitude.to_string(),
            delivery_location_latitude: self.delivery_location_latitude.to_string(),
            delivery_location_longitude: self.delivery_location_longitude.to_string(),
            order_date: self.order_date.format(&rules.date_format).to_string(),
            weatherconditions: self.weather.to_string(),
            road_traffic_density: self.traffic.to_string(),
            vehicle_condition: self.vehicle_condition.to_string(),
            type_of_order: self.order_type.clone(),
            multiple_deliveries: self.multiple_deliveries.to_string(),
            festival: self.festival.to_string(),
            city: self.city.clone(),
            time_taken: self.time_taken_min.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_parse_trims() {
        assert_eq!("Jam ".parse::<Traffic>().unwrap(), Traffic::Jam);
        assert!("NaN".parse::<Traffic>().is_err());
    }

    #[test]
    fn test_traffic_orders_by_label() {
        let mut all = Traffic::ALL.to_vec();
        all.sort();
        let labels: Vec<_> = all.iter().map(Traffic::label).collect();
        assert_eq!(labels, vec!["High", "Jam", "Low", "Medium"]);
    }

    #[test]
    fn test_weather_prefixed_and_bare() {
        assert_eq!(
            "conditions Sunny".parse::<Weather>().unwrap(),
            Weather::Sunny
        );
        assert_eq!("Fog".parse::<Weather>().unwrap(), Weather::Fog);
        assert_eq!(Weather::Sandstorms.to_string(), "conditions Sandstorms");
    }

    #[test]
    fn test_weather_unknown_kept_verbatim() {
        let w: Weather = "conditions NaN ".parse().unwrap();
        assert_eq!(w, Weather::Other("conditions NaN".to_string()));
        assert_eq!(w.to_string(), "conditions NaN");
    }

    #[test]
    fn test_weather_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Weather::Windy).unwrap(),
            "\"conditions Windy\""
        );
    }

    #[test]
    fn test_festival_parse() {
        assert_eq!("Yes ".parse::<Festival>().unwrap(), Festival::Yes);
        assert_eq!("no".parse::<Festival>().unwrap(), Festival::No);
        assert!("Maybe".parse::<Festival>().is_err());
    }
}
