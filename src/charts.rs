//! Self-contained chart descriptions handed to the rendering layer.
//!
//! Each builder takes a metric table and returns a [`Chart`] value; nothing
//! here holds figure state between calls.

use serde::Serialize;

use crate::metrics::types::{
    CityDistance, CityTime, CityTrafficTime, CityTrafficVolume, DailyCount, Geocenter,
    TrafficShare, WeeklyCount, WeeklyDeliveriesPerPerson,
};
use crate::metrics::utility::mean;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// One node of a hierarchical breakdown. Root nodes have no parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstNode {
    pub id: String,
    pub label: String,
    pub parent: Option<String>,
    pub value: f64,
    pub color: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar {
        title: String,
        x: Vec<String>,
        y: Vec<f64>,
        error_y: Option<Vec<Option<f64>>>,
    },
    Line {
        title: String,
        x: Vec<String>,
        y: Vec<f64>,
    },
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Bubble {
        title: String,
        x: Vec<String>,
        y: Vec<String>,
        size: Vec<f64>,
        color: Vec<String>,
    },
    Sunburst {
        title: String,
        nodes: Vec<SunburstNode>,
        color_midpoint: Option<f64>,
    },
    Map {
        title: String,
        markers: Vec<MapMarker>,
    },
}

pub fn orders_by_day(rows: &[DailyCount]) -> Chart {
    Chart::Bar {
        title: "Orders by Day".to_string(),
        x: rows.iter().map(|r| r.order_date.to_string()).collect(),
        y: rows.iter().map(|r| r.orders as f64).collect(),
        error_y: None,
    }
}

pub fn orders_by_week(rows: &[WeeklyCount]) -> Chart {
    Chart::Line {
        title: "Orders by Week".to_string(),
        x: rows.iter().map(|r| format!("{:02}", r.week_of_year)).collect(),
        y: rows.iter().map(|r| r.orders as f64).collect(),
    }
}

pub fn traffic_distribution(rows: &[TrafficShare]) -> Chart {
    Chart::Pie {
        title: "Orders Distribution per Traffic".to_string(),
        labels: rows.iter().map(|r| r.traffic.to_string()).collect(),
        values: rows.iter().map(|r| r.percentage).collect(),
    }
}

pub fn city_traffic_volume(rows: &[CityTrafficVolume]) -> Chart {
    Chart::Bubble {
        title: "Order Volume by City and Traffic".to_string(),
        x: rows.iter().map(|r| r.city.clone()).collect(),
        y: rows.iter().map(|r| r.traffic.to_string()).collect(),
        size: rows.iter().map(|r| r.orders as f64).collect(),
        color: rows.iter().map(|r| r.city.clone()).collect(),
    }
}

pub fn deliveries_per_person(rows: &[WeeklyDeliveriesPerPerson]) -> Chart {
    Chart::Line {
        title: "Deliveries by Person per Week".to_string(),
        x: rows.iter().map(|r| format!("{:02}", r.week_of_year)).collect(),
        y: rows.iter().map(|r| r.deliveries_per_person).collect(),
    }
}

pub fn geocenter_map(rows: &[Geocenter]) -> Chart {
    Chart::Map {
        title: "Country Map".to_string(),
        markers: rows
            .iter()
            .map(|r| MapMarker {
                latitude: r.latitude,
                longitude: r.longitude,
                label: format!("{} / {}", r.city, r.traffic),
            })
            .collect(),
    }
}

/// Mean delivery time per city with the standard deviation as error bars.
pub fn delivery_time_by_city(rows: &[CityTime]) -> Chart {
    Chart::Bar {
        title: "Average Delivery Time by City".to_string(),
        x: rows.iter().map(|r| r.city.clone()).collect(),
        y: rows.iter().map(|r| r.time_mean).collect(),
        error_y: Some(rows.iter().map(|r| r.time_std).collect()),
    }
}

pub fn distance_by_city(rows: &[CityDistance]) -> Chart {
    Chart::Pie {
        title: "Mean Distance by City".to_string(),
        labels: rows.iter().map(|r| r.city.clone()).collect(),
        values: rows.iter().map(|r| r.distance_mean_km).collect(),
    }
}

/// City → traffic breakdown sized by mean delivery time and colored by its
/// standard deviation, centered on the average deviation across groups.
pub fn delivery_time_by_city_traffic(rows: &[CityTrafficTime]) -> Chart {
    let mut nodes: Vec<SunburstNode> = Vec::new();

    for row in rows {
        if !nodes.iter().any(|n| n.parent.is_none() && n.id == row.city) {
            nodes.push(SunburstNode {
                id: row.city.clone(),
                label: row.city.clone(),
                parent: None,
                value: 0.0,
                color: None,
            });
        }
        if let Some(city) = nodes.iter_mut().find(|n| n.id == row.city) {
            city.value += row.time_mean;
        }
        nodes.push(SunburstNode {
            id: format!("{}/{}", row.city, row.traffic),
            label: row.traffic.to_string(),
            parent: Some(row.city.clone()),
            value: row.time_mean,
            color: row.time_std,
        });
    }

    let stds: Vec<f64> = rows.iter().filter_map(|r| r.time_std).collect();

    Chart::Sunburst {
        title: "Standard Deviation by City and Traffic".to_string(),
        nodes,
        color_midpoint: mean(&stds),
    }
}
