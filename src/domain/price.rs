//! Closing-price observations for a single instrument.

use chrono::NaiveDate;

use super::error::DcaError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closes strictly increasing by date.
///
/// Built once from provider output and read-only afterwards. An empty series
/// means the provider had no data for the requested ticker and range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build from points that must already be strictly increasing by date.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, DcaError> {
        check_strictly_increasing(&points)?;
        Ok(Self { points })
    }

    /// Build from provider rows in any order. Duplicate dates are rejected.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, DcaError> {
        points.sort_by_key(|p| p.date);
        if let Some(w) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(DcaError::DuplicateDate { date: w[1].date });
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
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

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

pub(crate) fn check_strictly_increasing(points: &[PricePoint]) -> Result<(), DcaError> {
    for w in points.windows(2) {
        if w[1].date == w[0].date {
            return Err(DcaError::DuplicateDate { date: w[1].date });
        }
        if w[1].date < w[0].date {
            return Err(DcaError::UnorderedSeries {
                previous: w[0].date,
                date: w[1].date,
            });
        }
    }
    Ok(())
}
