#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use dcasim::domain::error::DcaError;
pub use dcasim::domain::price::{PricePoint, PriceSeries};
use dcasim::domain::run_config::RunConfig;
use dcasim::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockDataPort {
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DcaError::DataSource {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .map(|pts| {
                pts.iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(points)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One close per calendar day from `start`, following `price_fn(day_index)`.
pub fn make_daily_points(start: NaiveDate, days: usize, price_fn: impl Fn(usize) -> f64) -> Vec<PricePoint> {
    (0..days)
        .map(|i| PricePoint::new(start + Duration::days(i as i64), price_fn(i)))
        .collect()
}

/// One close per weekday (Mon-Fri) from `start`.
pub fn make_trading_points(start: NaiveDate, days: usize, price_fn: impl Fn(usize) -> f64) -> Vec<PricePoint> {
    use chrono::Datelike;
    (0..days as i64)
        .map(|i| start + Duration::days(i))
        .filter(|d| d.weekday().number_from_monday() <= 5)
        .enumerate()
        .map(|(i, d)| PricePoint::new(d, price_fn(i)))
        .collect()
}

pub fn make_run_config(ticker: &str, start: NaiveDate, end: NaiveDate, custom: &str) -> RunConfig {
    RunConfig {
        ticker: ticker.to_string(),
        base_amount: 100.0,
        start_date: start,
        end_date: end,
        custom_cadence: custom.parse().unwrap(),
        normalize: true,
        extend_step_days: 1,
    }
}
