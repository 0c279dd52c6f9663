//! Order volume metrics: daily and weekly counts, traffic shares, and the
//! per-group delivery location centers.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::metrics::types::{
    CityTrafficVolume, DailyCount, Geocenter, TrafficShare, WeeklyCount,
    WeeklyDeliveriesPerPerson,
};
use crate::metrics::utility::{median, pct, week_of_year};
use crate::record::{Order, Traffic};

/// Distinct order ids per order date, ordered by date.
pub fn daily_order_count(orders: &[Order]) -> Vec<DailyCount> {
    let mut by_date: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
    for o in orders {
        by_date.entry(o.order_date).or_default().insert(o.id.as_str());
    }

    by_date
        .into_iter()
        .map(|(order_date, ids)| DailyCount {
            order_date,
            orders: ids.len(),
        })
        .collect()
}

/// Distinct order ids per Sunday-based week of the year.
pub fn weekly_order_count(orders: &[Order]) -> Vec<WeeklyCount> {
    let mut by_week: BTreeMap<u32, HashSet<&str>> = BTreeMap::new();
    for o in orders {
        by_week
            .entry(week_of_year(o.order_date))
            .or_default()
            .insert(o.id.as_str());
    }

    by_week
        .into_iter()
        .map(|(week_of_year, ids)| WeeklyCount {
            week_of_year,
            orders: ids.len(),
        })
        .collect()
}

/// Order count and percentage of the total per traffic density.
pub fn traffic_distribution(orders: &[Order]) -> Vec<TrafficShare> {
    let mut counts: BTreeMap<Traffic, usize> = BTreeMap::new();
    for o in orders {
        *counts.entry(o.traffic).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(traffic, count)| TrafficShare {
            traffic,
            orders: count,
            percentage: pct(count, orders.len()),
        })
        .collect()
}

pub fn city_traffic_volume(orders: &[Order]) -> Vec<CityTrafficVolume> {
    let mut counts: BTreeMap<(&str, Traffic), usize> = BTreeMap::new();
    for o in orders {
        *counts.entry((o.city.as_str(), o.traffic)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((city, traffic), count)| CityTrafficVolume {
            city: city.to_string(),
            traffic,
            orders: count,
        })
        .collect()
}

/// Orders in each week divided by the number of distinct delivery people
/// active that week. Every week present has at least one order, hence at
/// least one person.
pub fn deliveries_per_person_weekly(orders: &[Order]) -> Vec<WeeklyDeliveriesPerPerson> {
    let mut by_week: BTreeMap<u32, (usize, HashSet<&str>)> = BTreeMap::new();
    for o in orders {
        let entry = by_week.entry(week_of_year(o.order_date)).or_default();
        entry.0 += 1;
        entry.1.insert(o.delivery_person_id.as_str());
    }

    by_week
        .into_iter()
        .map(|(week_of_year, (count, people))| WeeklyDeliveriesPerPerson {
            week_of_year,
            orders: count,
            delivery_people: people.len(),
            deliveries_per_person: count as f64 / people.len() as f64,
        })
        .collect()
}

/// Median delivery latitude and longitude per (city, traffic) group, for the
/// first `limit` groups in key order.
pub fn geocenters(orders: &[Order], limit: usize) -> Vec<Geocenter> {
    let mut groups: BTreeMap<(&str, Traffic), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for o in orders {
        let entry = groups.entry((o.city.as_str(), o.traffic)).or_default();
        entry.0.push(o.delivery_location_latitude);
        entry.1.push(o.delivery_location_longitude);
    }

    groups
        .into_iter()
        .take(limit)
        .filter_map(|((city, traffic), (lats, lons))| {
            Some(Geocenter {
                city: city.to_string(),
                traffic,
                latitude: median(&lats)?,
                longitude: median(&lons)?,
            })
        })
        .collect()
}
