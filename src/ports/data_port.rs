//! Price data access port trait.

use crate::domain::error::DcaError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Daily closes for `ticker` between `start_date` and `end_date` inclusive.
    ///
    /// An unknown ticker or a range without observations yields an empty
    /// series, not an error.
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError>;

    fn name(&self) -> &str;
}
