//! DCA simulation ledger.
//!
//! `simulate` replays a fixed-amount contribution at every resampled
//! observation and records the running position after each purchase.

use chrono::NaiveDate;

use super::error::DcaError;
use super::resample::ResampledSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub price: f64,
    pub shares_bought: f64,
    pub cumulative_shares: f64,
    pub cumulative_investment: f64,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
    pub total_investment: f64,
    pub total_shares: f64,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Value of the accumulated shares at `price`.
    pub fn value_at(&self, price: f64) -> f64 {
        self.total_shares * price
    }
}

pub fn simulate(resampled: &ResampledSeries, contribution: f64) -> Result<Ledger, DcaError> {
    if !contribution.is_finite() || contribution <= 0.0 {
        return Err(DcaError::InvalidAmount {
            amount: contribution,
        });
    }

    let mut entries = Vec::with_capacity(resampled.len());
    let mut total_shares = 0.0;
    let mut total_investment = 0.0;

    for point in resampled.points() {
        if !point.close.is_finite() || point.close <= 0.0 {
            return Err(DcaError::InvalidPrice {
                date: point.date,
                price: point.close,
            });
        }

        let shares_bought = contribution / point.close;
        total_shares += shares_bought;
        total_investment += contribution;

        entries.push(LedgerEntry {
            date: point.date,
            price: point.close,
            shares_bought,
            cumulative_shares: total_shares,
            cumulative_investment: total_investment,
            portfolio_value: total_shares * point.close,
        });
    }

    Ok(Ledger {
        entries,
        total_investment,
        total_shares,
    })
}
