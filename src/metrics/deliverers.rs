//! Delivery-person metrics: speed rankings, age and vehicle ranges, ratings.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::metrics::types::{
    DelivererTime, Extremes, PersonRating, TrafficRating, WeatherRating,
};
use crate::metrics::utility::{group_in_order, mean, mean_std};
use crate::record::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Fastest,
    Slowest,
}

/// Mean time taken per (city, delivery person), keeping at most `per_city`
/// rows per city. `Fastest` sorts by (city, mean) ascending and `Slowest` by
/// (city, mean) descending. Ties keep the order in which the pair first appears.
pub fn top_deliverers(orders: &[Order], ranking: Ranking, per_city: usize) -> Vec<DelivererTime> {
    let groups = group_in_order(
        orders,
        |o| (o.city.clone(), o.delivery_person_id.clone()),
        |o| o.time_taken_min as f64,
    );

    let mut rows: Vec<DelivererTime> = groups
        .into_iter()
        .filter_map(|((city, delivery_person_id), times)| {
            Some(DelivererTime {
                city,
                delivery_person_id,
                time_mean: mean(&times)?,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let by_key = a.city.cmp(&b.city).then_with(|| {
            a.time_mean
                .partial_cmp(&b.time_mean)
                .unwrap_or(Ordering::Equal)
        });
        match ranking {
            Ranking::Fastest => by_key,
            Ranking::Slowest => by_key.reverse(),
        }
    });

    let mut taken: HashMap<String, usize> = HashMap::new();
    rows.retain(|row| {
        let n = taken.entry(row.city.clone()).or_default();
        *n += 1;
        *n <= per_city
    });

    rows
}

pub fn age_extremes(orders: &[Order]) -> Option<Extremes<u32>> {
    let min = orders.iter().map(|o| o.delivery_person_age).min()?;
    let max = orders.iter().map(|o| o.delivery_person_age).max()?;
    Some(Extremes { min, max })
}

pub fn vehicle_condition_extremes(orders: &[Order]) -> Option<Extremes<i64>> {
    let min = orders.iter().map(|o| o.vehicle_condition).min()?;
    let max = orders.iter().map(|o| o.vehicle_condition).max()?;
    Some(Extremes { min, max })
}

pub fn distinct_deliverers(orders: &[Order]) -> usize {
    orders
        .iter()
        .map(|o| o.delivery_person_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Present ratings grouped by key. Groups whose ratings are all absent are
/// kept with an empty series.
fn ratings_by<'a, K: Ord>(
    orders: &'a [Order],
    key: impl Fn(&'a Order) -> K,
) -> BTreeMap<K, Vec<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for o in orders {
        let series = groups.entry(key(o)).or_default();
        if let Some(r) = o.delivery_person_rating {
            series.push(r);
        }
    }
    groups
}

/// Mean rating per delivery person, ordered by id.
pub fn rating_by_person(orders: &[Order]) -> Vec<PersonRating> {
    ratings_by(orders, |o| o.delivery_person_id.as_str())
        .into_iter()
        .map(|(id, ratings)| PersonRating {
            delivery_person_id: id.to_string(),
            rating_mean: mean(&ratings),
        })
        .collect()
}

pub fn rating_by_traffic(orders: &[Order]) -> Vec<TrafficRating> {
    ratings_by(orders, |o| o.traffic)
        .into_iter()
        .map(|(traffic, ratings)| {
            let (rating_mean, rating_std) = mean_std(&ratings);
            TrafficRating {
                traffic,
                rating_mean,
                rating_std,
            }
        })
        .collect()
}

pub fn rating_by_weather(orders: &[Order]) -> Vec<WeatherRating> {
    ratings_by(orders, |o| &o.weather)
        .into_iter()
        .map(|(weather, ratings)| {
            let (rating_mean, rating_std) = mean_std(&ratings);
            WeatherRating {
                weather: weather.clone(),
                rating_mean,
                rating_std,
            }
        })
        .collect()
}
