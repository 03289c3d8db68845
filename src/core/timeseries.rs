//! Historical exchange rates

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

pub const API_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%m-%d-%Y";

/// Inclusive range of days requested from the time-series endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Three calendar months back from `today`, through `today`.
    pub fn last_three_months(today: NaiveDate) -> Self {
        let start = today.checked_sub_months(Months::new(3)).unwrap_or(today);
        DateRange { start, end: today }
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(API_DATE_FORMAT),
            self.end.format(API_DATE_FORMAT)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl RatePoint {
    /// Tooltip text for this point.
    pub fn label(&self) -> String {
        format!(
            "Date: {}, Value: {:.3}",
            self.date.format(DISPLAY_DATE_FORMAT),
            self.rate
        )
    }
}

/// Rate observations ordered by ascending date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<RatePoint>,
}

impl TimeSeries {
    /// Builds a series from points in any order.
    pub fn new(mut points: Vec<RatePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        TimeSeries { points }
    }

    /// Builds a series from a `date -> {code -> rate}` mapping, keeping only
    /// the rate for `target`. Dates without a `target` rate are skipped.
    pub fn from_daily_rates(
        daily: &HashMap<String, HashMap<String, f64>>,
        target: &str,
    ) -> Result<Self, chrono::ParseError> {
        let mut points = Vec::with_capacity(daily.len());
        for (day, rates) in daily {
            let date = NaiveDate::parse_from_str(day, API_DATE_FORMAT)?;
            if let Some(rate) = rates.get(target) {
                points.push(RatePoint { date, rate: *rate });
            }
        }
        Ok(Self::new(points))
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&RatePoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest rate, if any.
    pub fn rate_bounds(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.rate;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.rate), hi.max(p.rate))
        }))
    }

    /// Percentage change from the first to the last observation.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.points.first()?.rate;
        let last = self.points.last()?.rate;
        if first > 0.0 {
            Some((last - first) / first * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_three_months() {
        let range = DateRange::last_three_months(date(2024, 5, 31));
        assert_eq!(range.start, date(2024, 2, 29));
        assert_eq!(range.end, date(2024, 5, 31));
        assert_eq!(range.to_string(), "2024-02-29..2024-05-31");
    }

    #[test]
    fn test_from_daily_rates_sorts_by_date() {
        let body = r#"{
            "2024-03-01": {"EUR": 0.92},
            "2024-01-01": {"EUR": 0.90},
            "2024-02-01": {"EUR": 0.91}
        }"#;
        let daily: HashMap<String, HashMap<String, f64>> = serde_json::from_str(body).unwrap();
        let series = TimeSeries::from_daily_rates(&daily, "EUR").unwrap();

        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
        let rates: Vec<_> = series.points().iter().map(|p| p.rate).collect();
        assert_eq!(rates, vec![0.90, 0.91, 0.92]);
    }

    #[test]
    fn test_from_daily_rates_skips_missing_target() {
        let body = r#"{
            "2024-01-01": {"EUR": 0.90},
            "2024-01-02": {"GBP": 0.79}
        }"#;
        let daily: HashMap<String, HashMap<String, f64>> = serde_json::from_str(body).unwrap();
        let series = TimeSeries::from_daily_rates(&daily, "EUR").unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_from_daily_rates_rejects_bad_date() {
        let mut daily = HashMap::new();
        daily.insert("01/02/2024".to_string(), HashMap::from([("EUR".to_string(), 0.9)]));
        assert!(TimeSeries::from_daily_rates(&daily, "EUR").is_err());
    }

    #[test]
    fn test_label_and_summary() {
        let series = TimeSeries::new(vec![
            RatePoint {
                date: date(2024, 3, 1),
                rate: 0.92,
            },
            RatePoint {
                date: date(2024, 1, 1),
                rate: 0.8,
            },
        ]);
        assert_eq!(series.get(0).unwrap().label(), "Date: 01-01-2024, Value: 0.800");
        assert_eq!(series.rate_bounds(), Some((0.8, 0.92)));
        assert!((series.change_pct().unwrap() - 15.0).abs() < 1e-9);
        assert_eq!(TimeSeries::default().change_pct(), None);
    }
}
