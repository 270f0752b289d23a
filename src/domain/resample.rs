//! Interval resampling: one representative observation per cadence period.
//!
//! Weekly periods run Monday through Sunday. Monthly periods are calendar
//! months. An n-unit period groups n consecutive weeks or months, anchored at
//! the week or month containing the first observation, so periods are
//! contiguous and cover the whole series. The representative of a period is
//! its first observation; periods without observations are skipped.

use chrono::{Datelike, Duration, NaiveDate};

use super::cadence::{Cadence, CadenceUnit};
use super::error::DcaError;
use super::price::{check_strictly_increasing, PricePoint, PriceSeries};

/// One observation per cadence period, strictly increasing by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResampledSeries {
    points: Vec<PricePoint>,
}

impl ResampledSeries {
    /// Wrap points that are already one-per-period. Order is checked.
    pub fn from_points(points: Vec<PricePoint>) -> Result<Self, DcaError> {
        check_strictly_increasing(&points)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn resample(
    series: &PriceSeries,
    cadence: &Cadence,
    end_date: NaiveDate,
) -> Result<ResampledSeries, DcaError> {
    let (multiplier, unit) = cadence.period()?;
    let first = series.first().ok_or(DcaError::EmptySeries)?;
    let period_of = PeriodIndex::new(first.date, multiplier, unit);

    let mut points = Vec::new();
    let mut current: Option<i64> = None;

    for point in series.points() {
        let period = period_of.index(point.date);
        if current == Some(period) {
            continue;
        }
        current = Some(period);
        if point.date > end_date {
            break;
        }
        points.push(*point);
    }

    Ok(ResampledSeries { points })
}

struct PeriodIndex {
    anchor: NaiveDate,
    multiplier: i64,
    unit: CadenceUnit,
}

impl PeriodIndex {
    fn new(first: NaiveDate, multiplier: u32, unit: CadenceUnit) -> Self {
        let anchor = match unit {
            CadenceUnit::Week => {
                first - Duration::days(first.weekday().num_days_from_monday() as i64)
            }
            CadenceUnit::Month => first.with_day(1).unwrap_or(first),
        };
        Self {
            anchor,
            multiplier: multiplier as i64,
            unit,
        }
    }

    fn index(&self, date: NaiveDate) -> i64 {
        match self.unit {
            CadenceUnit::Week => (date - self.anchor).num_days().div_euclid(7 * self.multiplier),
            CadenceUnit::Month => {
                (month_ordinal(date) - month_ordinal(self.anchor)).div_euclid(self.multiplier)
            }
        }
    }
}

fn month_ordinal(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}
