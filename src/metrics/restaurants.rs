//! Restaurant-side metrics: delivery distance and delivery time breakdowns.

use geo::{HaversineDistance, point};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::metrics::types::{
    CityDistance, CityOrderTypeTime, CityTime, CityTrafficTime, FestivalTime,
};
use crate::metrics::utility::{mean, mean_std, round2};
use crate::record::{Festival, Order};

/// Great-circle distance between the restaurant and the delivery location.
pub fn order_distance_km(order: &Order) -> f64 {
    let restaurant = point!(x: order.restaurant_longitude, y: order.restaurant_latitude);
    let delivery = point!(
        x: order.delivery_location_longitude,
        y: order.delivery_location_latitude
    );
    restaurant.haversine_distance(&delivery) / 1000.0
}

/// Mean per-order distance, rounded to 2 decimals.
pub fn mean_distance_km(orders: &[Order]) -> Option<f64> {
    let distances: Vec<f64> = orders.iter().map(order_distance_km).collect();
    mean(&distances).map(round2)
}

/// Mean time taken per festival flag, rounded to 2 decimals.
pub fn delivery_time_by_festival(orders: &[Order]) -> Vec<FestivalTime> {
    let mut groups: BTreeMap<Festival, Vec<f64>> = BTreeMap::new();
    for o in orders {
        groups
            .entry(o.festival)
            .or_default()
            .push(o.time_taken_min as f64);
    }

    groups
        .into_iter()
        .filter_map(|(festival, times)| {
            Some(FestivalTime {
                festival,
                time_mean: round2(mean(&times)?),
            })
        })
        .collect()
}

/// Picks the row for `festival` out of [`delivery_time_by_festival`].
pub fn festival_time(rows: &[FestivalTime], festival: Festival) -> Option<f64> {
    rows.iter()
        .find(|r| r.festival == festival)
        .map(|r| r.time_mean)
}

fn times_by<'a, K: Ord>(
    orders: &'a [Order],
    key: impl Fn(&'a Order) -> K,
) -> BTreeMap<K, Vec<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for o in orders {
        groups
            .entry(key(o))
            .or_default()
            .push(o.time_taken_min as f64);
    }
    groups
}

/// Stable sort by city ascending, then mean descending within a city.
fn sort_within_city_desc<T>(rows: &mut [T], city: impl Fn(&T) -> &str, mean: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| {
        city(a).cmp(city(b)).then_with(|| {
            mean(b)
                .partial_cmp(&mean(a))
                .unwrap_or(Ordering::Equal)
        })
    });
}

pub fn delivery_time_by_city(orders: &[Order]) -> Vec<CityTime> {
    times_by(orders, |o| o.city.as_str())
        .into_iter()
        .filter_map(|(city, times)| {
            let (time_mean, time_std) = mean_std(&times);
            Some(CityTime {
                city: city.to_string(),
                time_mean: time_mean?,
                time_std,
            })
        })
        .collect()
}

pub fn delivery_time_by_city_order_type(orders: &[Order]) -> Vec<CityOrderTypeTime> {
    let mut rows: Vec<CityOrderTypeTime> =
        times_by(orders, |o| (o.city.as_str(), o.order_type.as_str()))
            .into_iter()
            .filter_map(|((city, order_type), times)| {
                let (time_mean, time_std) = mean_std(&times);
                Some(CityOrderTypeTime {
                    city: city.to_string(),
                    order_type: order_type.to_string(),
                    time_mean: time_mean?,
                    time_std,
                })
            })
            .collect();

    sort_within_city_desc(&mut rows, |r| r.city.as_str(), |r| r.time_mean);
    rows
}

pub fn delivery_time_by_city_traffic(orders: &[Order]) -> Vec<CityTrafficTime> {
    let mut rows: Vec<CityTrafficTime> = times_by(orders, |o| (o.city.as_str(), o.traffic))
        .into_iter()
        .filter_map(|((city, traffic), times)| {
            let (time_mean, time_std) = mean_std(&times);
            Some(CityTrafficTime {
                city: city.to_string(),
                traffic,
                time_mean: time_mean?,
                time_std,
            })
        })
        .collect();

    sort_within_city_desc(&mut rows, |r| r.city.as_str(), |r| r.time_mean);
    rows
}

/// Mean per-order distance per city, with each city's share of the summed means.
pub fn distance_by_city(orders: &[Order]) -> Vec<CityDistance> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for o in orders {
        groups
            .entry(o.city.as_str())
            .or_default()
            .push(order_distance_km(o));
    }

    let means: Vec<(&str, f64)> = groups
        .into_iter()
        .filter_map(|(city, distances)| Some((city, mean(&distances)?)))
        .collect();
    let total: f64 = means.iter().map(|(_, m)| m).sum();

    means
        .into_iter()
        .map(|(city, distance_mean_km)| CityDistance {
            city: city.to_string(),
            distance_mean_km,
            share_pct: if total > 0.0 {
                distance_mean_km / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::order;
    use crate::record::{Traffic, Weather};

    fn timed(city: &str, minutes: u32) -> Order {
        let mut o = order("x", (2022, 3, 1), Traffic::Low, Weather::Sunny);
        o.city = city.to_string();
        o.time_taken_min = minutes;
        o
    }

    #[test]
    fn test_distance_identical_points() {
        let mut o = timed("Urban", 20);
        o.restaurant_latitude = 12.97;
        o.restaurant_longitude = 77.59;
        o.delivery_location_latitude = 12.97;
        o.delivery_location_longitude = 77.59;
        assert_eq!(order_distance_km(&o), 0.0);
    }

    #[test]
    fn test_distance_one_degree_at_equator() {
        let d = order_distance_km(&timed("Urban", 20));
        assert!((d - 111.19).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_distance_symmetric() {
        let mut there = timed("Urban", 20);
        there.restaurant_latitude = 22.745049;
        there.restaurant_longitude = 75.892471;
        there.delivery_location_latitude = 22.765049;
        there.delivery_location_longitude = 75.912471;

        let mut back = there.clone();
        back.restaurant_latitude = there.delivery_location_latitude;
        back.restaurant_longitude = there.delivery_location_longitude;
        back.delivery_location_latitude = there.restaurant_latitude;
        back.delivery_location_longitude = there.restaurant_longitude;

        assert!((order_distance_km(&there) - order_distance_km(&back)).abs() < 1e-9);
    }

    #[test]
    fn test_mean_distance_rounded() {
        // The shared fixture order spans one degree of longitude at the equator.
        let orders = vec![timed("Urban", 10), timed("Urban", 20)];
        assert_eq!(mean_distance_km(&orders), Some(111.2));
        assert_eq!(mean_distance_km(&[]), None);
    }

    #[test]
    fn test_delivery_time_by_festival() {
        let mut fest = timed("Urban", 45);
        fest.festival = Festival::Yes;
        let orders = vec![timed("Urban", 20), timed("Urban", 25), fest];

        let rows = delivery_time_by_festival(&orders);
        assert_eq!(festival_time(&rows, Festival::No), Some(22.5));
        assert_eq!(festival_time(&rows, Festival::Yes), Some(45.0));
        assert_eq!(festival_time(&delivery_time_by_festival(&[]), Festival::Yes), None);
    }

    #[test]
    fn test_festival_time_rounds() {
        let orders = vec![timed("Urban", 10), timed("Urban", 10), timed("Urban", 11)];
        let rows = delivery_time_by_festival(&orders);
        assert_eq!(rows[0].time_mean, 10.33);
    }

    #[test]
    fn test_delivery_time_by_city() {
        let orders = vec![
            timed("Urban", 20),
            timed("Urban", 30),
            timed("Semi-Urban", 50),
        ];
        let rows = delivery_time_by_city(&orders);

        assert_eq!(rows[0].city, "Semi-Urban");
        assert_eq!(rows[0].time_std, None);
        assert_eq!(rows[1].time_mean, 25.0);
        assert!((rows[1].time_std.unwrap() - 7.0710678118654755).abs() < 1e-12);
    }

    #[test]
    fn test_city_order_type_sorted_desc_within_city() {
        let mut snack = timed("Urban", 15);
        snack.order_type = "Snack".to_string();
        let mut buffet = timed("Urban", 35);
        buffet.order_type = "Buffet".to_string();
        let mut metro = timed("Metropolitian", 25);
        metro.order_type = "Drinks".to_string();

        let rows = delivery_time_by_city_order_type(&[snack, metro, buffet]);
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.city.as_str(), r.order_type.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Metropolitian", "Drinks"),
                ("Urban", "Buffet"),
                ("Urban", "Snack")
            ]
        );
    }

    #[test]
    fn test_city_order_type_ties_keep_group_order() {
        let mut snack = timed("Urban", 30);
        snack.order_type = "Snack".to_string();
        let mut buffet = timed("Urban", 30);
        buffet.order_type = "Buffet".to_string();
        let mut meal = timed("Urban", 30);
        meal.order_type = "Meal".to_string();

        let rows = delivery_time_by_city_order_type(&[snack, meal, buffet]);
        let types: Vec<_> = rows.iter().map(|r| r.order_type.as_str()).collect();
        assert_eq!(types, vec!["Buffet", "Meal", "Snack"]);
    }

    #[test]
    fn test_city_traffic_ties_keep_group_order() {
        let mut jam = timed("Urban", 25);
        jam.traffic = Traffic::Jam;
        let low = timed("Urban", 25);
        let mut high = timed("Urban", 25);
        high.traffic = Traffic::High;

        let rows = delivery_time_by_city_traffic(&[low, jam, high]);
        let traffic: Vec<_> = rows.iter().map(|r| r.traffic).collect();
        assert_eq!(traffic, vec![Traffic::High, Traffic::Jam, Traffic::Low]);
    }

    #[test]
    fn test_city_traffic_sorted_desc_within_city() {
        let mut jam = timed("Urban", 40);
        jam.traffic = Traffic::Jam;
        let low = timed("Urban", 20);
        let mut high = timed("Urban", 30);
        high.traffic = Traffic::High;

        let rows = delivery_time_by_city_traffic(&[low, jam, high]);
        let traffic: Vec<_> = rows.iter().map(|r| r.traffic).collect();
        assert_eq!(traffic, vec![Traffic::Jam, Traffic::High, Traffic::Low]);
    }

    #[test]
    fn test_distance_by_city_shares() {
        let near = {
            let mut o = timed("Urban", 20);
            o.delivery_location_longitude = 0.5;
            o
        };
        let far = timed("Metropolitian", 20);

        let rows = distance_by_city(&[near, far]);
        let total: f64 = rows.iter().map(|r| r.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(rows[0].city, "Metropolitian");
        assert!(rows[0].distance_mean_km > rows[1].distance_mean_km);
    }
}
