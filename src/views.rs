//! The three dashboard pages, each assembled from a filtered order set.

use serde::Serialize;
use tracing::debug;

use crate::charts::{self, Chart};
use crate::config::Limits;
use crate::metrics::deliverers::{self, Ranking};
use crate::metrics::volume;
use crate::metrics::restaurants;
use crate::metrics::types::{
    CityOrderTypeTime, CityTrafficVolume, DailyCount, DelivererTime, Extremes, Geocenter,
    PersonRating, TrafficRating, TrafficShare, WeatherRating, WeeklyCount,
    WeeklyDeliveriesPerPerson,
};
use crate::record::{Festival, Order};

/// A metric table together with the chart drawn from it.
#[derive(Debug, Clone, Serialize)]
pub struct Panel<T> {
    pub table: Vec<T>,
    pub chart: Chart,
}

impl<T> Panel<T> {
    fn new(table: Vec<T>, draw: impl Fn(&[T]) -> Chart) -> Self {
        let chart = draw(&table);
        Self { table, chart }
    }
}

/// Company-wide order volume: management, tactical and geographic tabs.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessView {
    pub orders_by_day: Panel<DailyCount>,
    pub traffic_distribution: Panel<TrafficShare>,
    pub city_traffic_volume: Panel<CityTrafficVolume>,
    pub orders_by_week: Panel<WeeklyCount>,
    pub deliveries_per_person: Panel<WeeklyDeliveriesPerPerson>,
    pub geocenters: Panel<Geocenter>,
}

impl BusinessView {
    #[tracing::instrument(skip_all, fields(orders = orders.len()))]
    pub fn build(orders: &[Order], limits: &Limits) -> Self {
        let view = Self {
            orders_by_day: Panel::new(volume::daily_order_count(orders), charts::orders_by_day),
            traffic_distribution: Panel::new(
                volume::traffic_distribution(orders),
                charts::traffic_distribution,
            ),
            city_traffic_volume: Panel::new(
                volume::city_traffic_volume(orders),
                charts::city_traffic_volume,
            ),
            orders_by_week: Panel::new(volume::weekly_order_count(orders), charts::orders_by_week),
            deliveries_per_person: Panel::new(
                volume::deliveries_per_person_weekly(orders),
                charts::deliveries_per_person,
            ),
            geocenters: Panel::new(
                volume::geocenters(orders, limits.geocenter_groups),
                charts::geocenter_map,
            ),
        };
        debug!(days = view.orders_by_day.table.len(), "Business view built");
        view
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryPersonView {
    pub age: Option<Extremes<u32>>,
    pub vehicle_condition: Option<Extremes<i64>>,
    pub rating_by_person: Vec<PersonRating>,
    pub rating_by_traffic: Vec<TrafficRating>,
    pub rating_by_weather: Vec<WeatherRating>,
    pub fastest: Vec<DelivererTime>,
    pub slowest: Vec<DelivererTime>,
}

impl DeliveryPersonView {
    #[tracing::instrument(skip_all, fields(orders = orders.len()))]
    pub fn build(orders: &[Order], limits: &Limits) -> Self {
        Self {
            age: deliverers::age_extremes(orders),
            vehicle_condition: deliverers::vehicle_condition_extremes(orders),
            rating_by_person: deliverers::rating_by_person(orders),
            rating_by_traffic: deliverers::rating_by_traffic(orders),
            rating_by_weather: deliverers::rating_by_weather(orders),
            fastest: deliverers::top_deliverers(orders, Ranking::Fastest, limits.top_deliverers),
            slowest: deliverers::top_deliverers(orders, Ranking::Slowest, limits.top_deliverers),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantView {
    pub distinct_deliverers: usize,
    pub mean_distance_km: Option<f64>,
    pub festival_time_mean: Option<f64>,
    pub no_festival_time_mean: Option<f64>,
    pub delivery_time_by_city: Chart,
    pub delivery_time_by_order_type: Vec<CityOrderTypeTime>,
    pub distance_by_city: Chart,
    pub delivery_time_by_city_traffic: Chart,
}

impl RestaurantView {
    #[tracing::instrument(skip_all, fields(orders = orders.len()))]
    pub fn build(orders: &[Order]) -> Self {
        let festival = restaurants::delivery_time_by_festival(orders);

        Self {
            distinct_deliverers: deliverers::distinct_deliverers(orders),
            mean_distance_km: restaurants::mean_distance_km(orders),
            festival_time_mean: restaurants::festival_time(&festival, Festival::Yes),
            no_festival_time_mean: restaurants::festival_time(&festival, Festival::No),
            delivery_time_by_city: charts::delivery_time_by_city(
                &restaurants::delivery_time_by_city(orders),
            ),
            delivery_time_by_order_type: restaurants::delivery_time_by_city_order_type(orders),
            distance_by_city: charts::distance_by_city(&restaurants::distance_by_city(orders)),
            delivery_time_by_city_traffic: charts::delivery_time_by_city_traffic(
                &restaurants::delivery_time_by_city_traffic(orders),
            ),
        }
    }
}

/// Which dashboard page to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Business,
    DeliveryPerson,
    Restaurant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum View {
    Business(BusinessView),
    DeliveryPerson(DeliveryPersonView),
    Restaurant(RestaurantView),
}

impl View {
    pub fn build(kind: ViewKind, orders: &[Order], limits: &Limits) -> Self {
        match kind {
            ViewKind::Business => View::Business(BusinessView::build(orders, limits)),
            ViewKind::DeliveryPerson => {
                View::DeliveryPerson(DeliveryPersonView::build(orders, limits))
            }
            ViewKind::Restaurant => View::Restaurant(RestaurantView::build(orders)),
        }
    }
}
