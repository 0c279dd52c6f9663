//! Result rows produced by the metric functions.

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::{Festival, Traffic, Weather};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub order_date: NaiveDate,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyCount {
    pub week_of_year: u32,
    pub orders: usize,
}

/// Share of orders under one traffic density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficShare {
    pub traffic: Traffic,
    pub orders: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTrafficVolume {
    pub city: String,
    pub traffic: Traffic,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyDeliveriesPerPerson {
    pub week_of_year: u32,
    pub orders: usize,
    pub delivery_people: usize,
    pub deliveries_per_person: f64,
}

/// Median delivery location of a (city, traffic) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geocenter {
    pub city: String,
    pub traffic: Traffic,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelivererTime {
    pub city: String,
    pub delivery_person_id: String,
    pub time_mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremes<T> {
    pub min: T,
    pub max: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRating {
    pub delivery_person_id: String,
    pub rating_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRating {
    pub traffic: Traffic,
    pub rating_mean: Option<f64>,
    pub rating_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRating {
    pub weather: Weather,
    pub rating_mean: Option<f64>,
    pub rating_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FestivalTime {
    pub festival: Festival,
    pub time_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTime {
    pub city: String,
    pub time_mean: f64,
    pub time_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityOrderTypeTime {
    pub city: String,
    pub order_type: String,
    pub time_mean: f64,
    pub time_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityTrafficTime {
    pub city: String,
    pub traffic: Traffic,
    pub time_mean: f64,
    pub time_std: Option<f64>,
}

/// Mean restaurant-to-customer distance of a city, and that mean's share of
/// the sum over all cities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityDistance {
    pub city: String,
    pub distance_mean_km: f64,
    pub share_pct: f64,
}
