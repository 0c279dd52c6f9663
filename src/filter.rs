//! Date, traffic and weather selection over cleaned orders.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::record::{Order, Traffic, Weather};

/// The dashboard's current selection. An empty category set accepts nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFilter {
    /// Exclusive upper bound on the order date.
    pub cutoff: NaiveDate,
    pub traffic: HashSet<Traffic>,
    pub weather: HashSet<Weather>,
}

impl Default for OrderFilter {
    /// Cutoff 2022-04-13 with every traffic density and named weather condition.
    fn default() -> Self {
        let cutoff = NaiveDate::from_ymd_opt(2022, 4, 13).unwrap_or_default();
        Self::all_categories(cutoff)
    }
}

impl OrderFilter {
    pub fn new(
        cutoff: NaiveDate,
        traffic: impl IntoIterator<Item = Traffic>,
        weather: impl IntoIterator<Item = Weather>,
    ) -> Self {
        Self {
            cutoff,
            traffic: traffic.into_iter().collect(),
            weather: weather.into_iter().collect(),
        }
    }

    pub fn all_categories(cutoff: NaiveDate) -> Self {
        Self::new(cutoff, Traffic::ALL, Weather::NAMED)
    }

    pub fn accepts(&self, order: &Order) -> bool {
        order.order_date < self.cutoff
            && self.traffic.contains(&order.traffic)
            && self.weather.contains(&order.weather)
    }

    /// Returns the accepted orders, in input order.
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.accepts(o)).cloned().collect()
    }
}
