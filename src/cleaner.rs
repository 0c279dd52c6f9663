//! Turning raw source rows into typed [`Order`] records.
//!
//! Rows whose age, traffic density, festival flag, city or
//! multiple-deliveries cell holds the sentinel marker are dropped. Any other
//! value that fails to parse aborts the whole pass.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CleaningRules;
use crate::error::{CleanError, Result};
use crate::record::{Festival, Order, RawOrder, Traffic, Weather};

/// Row counts collected during one cleaning pass.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CleanReport {
    pub total_rows: usize,
    pub dropped_age: usize,
    pub dropped_traffic: usize,
    pub dropped_festival: usize,
    pub dropped_city: usize,
    pub dropped_multiple_deliveries: usize,
    pub kept: usize,
}

impl CleanReport {
    pub fn dropped(&self) -> usize {
        self.total_rows - self.kept
    }
}

pub struct Cleaner {
    rules: CleaningRules,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(CleaningRules::default())
    }
}

impl Cleaner {
    pub fn new(rules: CleaningRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CleaningRules {
        &self.rules
    }

    /// Cleans every row, returning the survivors in input order.
    pub fn clean(&self, rows: &[RawOrder]) -> Result<Vec<Order>> {
        self.clean_with_report(rows).map(|(orders, _)| orders)
    }

    #[tracing::instrument(skip_all, fields(rows = rows.len()))]
    pub fn clean_with_report(&self, rows: &[RawOrder]) -> Result<(Vec<Order>, CleanReport)> {
        let mut report = CleanReport {
            total_rows: rows.len(),
            ..Default::default()
        };
        let mut orders = Vec::with_capacity(rows.len());

        for (idx, raw) in rows.iter().enumerate() {
            if let Some(order) = self.clean_row(idx + 1, raw, &mut report)? {
                orders.push(order);
            }
        }

        report.kept = orders.len();
        info!(
            total = report.total_rows,
            kept = report.kept,
            dropped_age = report.dropped_age,
            dropped_traffic = report.dropped_traffic,
            dropped_festival = report.dropped_festival,
            dropped_city = report.dropped_city,
            dropped_multiple_deliveries = report.dropped_multiple_deliveries,
            "Cleaning pass complete"
        );

        Ok((orders, report))
    }

    /// Applies the cleaning steps to one row in order. `Ok(None)` means the
    /// row was dropped for a sentinel value.
    fn clean_row(
        &self,
        row: usize,
        raw: &RawOrder,
        report: &mut CleanReport,
    ) -> Result<Option<Order>> {
        if self.is_sentinel(&raw.delivery_person_age) {
            report.dropped_age += 1;
            return Ok(None);
        }
        let delivery_person_age =
            parse_non_negative(row, "delivery_person_age", &raw.delivery_person_age)?;

        if self.is_sentinel(&raw.road_traffic_density) {
            report.dropped_traffic += 1;
            return Ok(None);
        }
        if self.is_sentinel(&raw.festival) {
            report.dropped_festival += 1;
            return Ok(None);
        }
        if self.is_sentinel(&raw.city) {
            report.dropped_city += 1;
            return Ok(None);
        }

        let time_taken_min = self.parse_time_taken(row, &raw.time_taken)?;
        let delivery_person_rating = self.parse_rating(row, &raw.delivery_person_ratings)?;
        let order_date = self.parse_date(row, &raw.order_date)?;

        if self.is_sentinel(&raw.multiple_deliveries) {
            report.dropped_multiple_deliveries += 1;
            return Ok(None);
        }
        let multiple_deliveries =
            parse_non_negative(row, "multiple_deliveries", &raw.multiple_deliveries)?;

        let traffic: Traffic =
            raw.road_traffic_density
                .parse()
                .map_err(|_| CleanError::UnknownCategory {
                    row,
                    column: "road_traffic_density",
                    value: raw.road_traffic_density.clone(),
                })?;
        let festival: Festival = raw
            .festival
            .parse()
            .map_err(|_| CleanError::UnknownCategory {
                row,
                column: "festival",
                value: raw.festival.clone(),
            })?;
        let weather: Weather = raw
            .weatherconditions
            .parse()
            .unwrap_or_else(|_| Weather::Other(raw.weatherconditions.trim().to_string()));

        let vehicle_condition = parse_integer(row, "vehicle_condition", &raw.vehicle_condition)?;

        debug!(row, id = raw.id.trim(), "Row cleaned");

        Ok(Some(Order {
            id: raw.id.trim().to_string(),
            delivery_person_id: raw.delivery_person_id.trim().to_string(),
            delivery_person_age,
            delivery_person_rating,
            restaurant_latitude: parse_float(row, "restaurant_latitude", &raw.restaurant_latitude)?,
            restaurant_longitude: parse_float(
                row,
                "restaurant_longitude",
                &raw.restaurant_longitude,
            )?,
            delivery_location_latitude: parse_float(
                row,
                "delivery_location_latitude",
                &raw.delivery_location_latitude,
            )?,
            delivery_location_longitude: parse_float(
                row,
                "delivery_location_longitude",
                &raw.delivery_location_longitude,
            )?,
            order_date,
            weather,
            traffic,
            vehicle_condition,
            order_type: raw.type_of_order.trim().to_string(),
            multiple_deliveries,
            festival,
            city: raw.city.trim().to_string(),
            time_taken_min,
        }))
    }

    fn is_sentinel(&self, value: &str) -> bool {
        value.trim() == self.rules.sentinel.trim()
    }

    /// Reads the minutes from the trailing characters of cells like `(min) 24`.
    fn parse_time_taken(&self, row: usize, value: &str) -> Result<u32> {
        let suffix = trailing_chars(value, self.rules.time_taken_suffix_width);
        match suffix.trim().parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(CleanError::InvalidTimeTaken {
                row,
                value: value.to_string(),
            }),
        }
    }

    fn parse_rating(&self, row: usize, value: &str) -> Result<Option<f64>> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || self.is_sentinel(trimmed)
        {
            return Ok(None);
        }
        parse_float(row, "delivery_person_ratings", trimmed).map(Some)
    }

    fn parse_date(&self, row: usize, value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), &self.rules.date_format).map_err(|_| {
            CleanError::InvalidDate {
                row,
                value: value.to_string(),
                format: self.rules.date_format.clone(),
            }
        })
    }
}

fn trailing_chars(value: &str, width: usize) -> &str {
    if width == 0 {
        return "";
    }
    match value.char_indices().rev().nth(width - 1) {
        Some((start, _)) => &value[start..],
        None => value,
    }
}

fn parse_integer(row: usize, column: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| CleanError::InvalidInteger {
            row,
            column,
            value: value.to_string(),
        })
}

fn parse_non_negative(row: usize, column: &'static str, value: &str) -> Result<u32> {
    let parsed = parse_integer(row, column, value)?;
    if parsed < 0 {
        return Err(CleanError::Negative {
            row,
            column,
            value: parsed,
        });
    }
    u32::try_from(parsed).map_err(|_| CleanError::InvalidInteger {
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_float(row: usize, column: &'static str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CleanError::InvalidNumber {
            row,
            column,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawOrder {
        RawOrder {
            id: "0x4607 ".to_string(),
            delivery_person_id: "INDORES13DEL02 ".to_string(),
            delivery_person_age: "37".to_string(),
            delivery_person_ratings: "4.9".to_string(),
            restaurant_latitude: "22.745049".to_string(),
            restaurant_longitude: "75.892471".to_string(),
            delivery_location_latitude: "22.765049".to_string(),
            delivery_location_longitude: "75.912471".to_string(),
            order_date: "19-03-2022".to_string(),
            weatherconditions: "conditions Sunny".to_string(),
            road_traffic_density: "High ".to_string(),
            vehicle_condition: "2".to_string(),
            type_of_order: "Snack ".to_string(),
            multiple_deliveries: "0".to_string(),
            festival: "No ".to_string(),
            city: "Urban ".to_string(),
            time_taken: "(min) 24".to_string(),
        }
    }

    #[test]
    fn test_clean_valid_row() {
        let orders = Cleaner::default().clean(&[raw()]).unwrap();
        assert_eq!(orders.len(), 1);

        let o = &orders[0];
        assert_eq!(o.id, "0x4607");
        assert_eq!(o.delivery_person_id, "INDORES13DEL02");
        assert_eq!(o.delivery_person_age, 37);
        assert_eq!(o.delivery_person_rating, Some(4.9));
        assert_eq!(o.order_date, NaiveDate::from_ymd_opt(2022, 3, 19).unwrap());
        assert_eq!(o.traffic, Traffic::High);
        assert_eq!(o.weather, Weather::Sunny);
        assert_eq!(o.festival, Festival::No);
        assert_eq!(o.city, "Urban");
        assert_eq!(o.order_type, "Snack");
        assert_eq!(o.time_taken_min, 24);
    }

    #[test]
    fn test_sentinel_rows_are_dropped() {
        let mut age = raw();
        age.delivery_person_age = "NaN ".to_string();
        let mut traffic = raw();
        traffic.road_traffic_density = "NaN ".to_string();
        let mut festival = raw();
        festival.festival = "NaN ".to_string();
        let mut city = raw();
        city.city = "NaN ".to_string();
        let mut multi = raw();
        multi.multiple_deliveries = "NaN ".to_string();

        let (orders, report) = Cleaner::default()
            .clean_with_report(&[age, traffic, festival, city, multi, raw()])
            .unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(report.total_rows, 6);
        assert_eq!(report.dropped_age, 1);
        assert_eq!(report.dropped_traffic, 1);
        assert_eq!(report.dropped_festival, 1);
        assert_eq!(report.dropped_city, 1);
        assert_eq!(report.dropped_multiple_deliveries, 1);
        assert_eq!(report.dropped(), 5);
    }

    #[test]
    fn test_sentinel_drop_precedes_parse_errors() {
        let mut row = raw();
        row.delivery_person_age = "NaN ".to_string();
        row.order_date = "not a date".to_string();
        assert!(Cleaner::default().clean(&[row]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_rating_becomes_none() {
        let mut blank = raw();
        blank.delivery_person_ratings = String::new();
        let mut nan = raw();
        nan.delivery_person_ratings = "NaN ".to_string();

        let orders = Cleaner::default().clean(&[blank, nan]).unwrap();
        assert!(orders.iter().all(|o| o.delivery_person_rating.is_none()));
    }

    #[test]
    fn test_single_digit_time_taken() {
        let mut row = raw();
        row.time_taken = "(min) 9".to_string();
        let orders = Cleaner::default().clean(&[row]).unwrap();
        assert_eq!(orders[0].time_taken_min, 9);
    }

    #[test]
    fn test_custom_suffix_width() {
        let mut row = raw();
        row.time_taken = "minutes: 105".to_string();
        let cleaner = Cleaner::new(CleaningRules {
            time_taken_suffix_width: 3,
            ..Default::default()
        });
        assert_eq!(cleaner.clean(&[row]).unwrap()[0].time_taken_min, 105);
    }

    #[test]
    fn test_malformed_age_fails() {
        let mut row = raw();
        row.delivery_person_age = "thirty".to_string();
        let err = Cleaner::default().clean(&[raw(), row]).unwrap_err();
        assert!(matches!(
            err,
            CleanError::InvalidInteger { row: 2, column: "delivery_person_age", .. }
        ));
    }

    #[test]
    fn test_negative_age_fails() {
        let mut row = raw();
        row.delivery_person_age = "-4".to_string();
        assert!(matches!(
            Cleaner::default().clean(&[row]).unwrap_err(),
            CleanError::Negative { value: -4, .. }
        ));
    }

    #[test]
    fn test_negative_multiple_deliveries_fails() {
        let mut row = raw();
        row.multiple_deliveries = " -1".to_string();
        assert!(matches!(
            Cleaner::default().clean(&[row]).unwrap_err(),
            CleanError::Negative {
                column: "multiple_deliveries",
                value: -1,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_time_taken_fails() {
        let mut row = raw();
        row.time_taken = "(min) xx".to_string();
        assert!(matches!(
            Cleaner::default().clean(&[row]).unwrap_err(),
            CleanError::InvalidTimeTaken { row: 1, .. }
        ));

        let mut zero = raw();
        zero.time_taken = "(min) 00".to_string();
        assert!(Cleaner::default().clean(&[zero]).is_err());
    }

    #[test]
    fn test_malformed_date_fails() {
        let mut row = raw();
        row.order_date = "2022/03/19".to_string();
        assert!(matches!(
            Cleaner::default().clean(&[row]).unwrap_err(),
            CleanError::InvalidDate { .. }
        ));
    }

    #[test]
    fn test_unknown_traffic_fails() {
        let mut row = raw();
        row.road_traffic_density = "Gridlock".to_string();
        assert!(matches!(
            Cleaner::default().clean(&[row]).unwrap_err(),
            CleanError::UnknownCategory { column: "road_traffic_density", .. }
        ));
    }

    #[test]
    fn test_custom_sentinel() {
        let mut row = raw();
        row.city = "N/A".to_string();
        let cleaner = Cleaner::new(CleaningRules {
            sentinel: "N/A".to_string(),
            ..Default::default()
        });
        assert!(cleaner.clean(&[row]).unwrap().is_empty());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut no_rating = raw();
        no_rating.delivery_person_ratings = "NaN ".to_string();
        no_rating.time_taken = "(min) 7".to_string();

        let cleaner = Cleaner::default();
        let once = cleaner.clean(&[raw(), no_rating]).unwrap();
        let again_raw: Vec<RawOrder> = once.iter().map(|o| o.to_raw(cleaner.rules())).collect();
        let twice = cleaner.clean(&again_raw).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_trailing_chars() {
        assert_eq!(trailing_chars("(min) 24", 2), "24");
        assert_eq!(trailing_chars("7", 2), "7");
        assert_eq!(trailing_chars("abc", 0), "");
    }
}
