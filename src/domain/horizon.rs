//! Horizon extension for chart alignment.
//!
//! Pads a finished ledger with flat-value entries so that every cadence's
//! curve reaches the same end date.

use chrono::{Duration, NaiveDate};

use super::error::DcaError;
use super::ledger::{Ledger, LedgerEntry};

/// A ledger followed by synthetic, zero-purchase entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedLedger {
    pub ledger: Ledger,
    /// Index into `ledger.entries` where the synthetic tail begins.
    pub synthetic_from: usize,
}

impl ExtendedLedger {
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.ledger.entries
    }

    pub fn real_entries(&self) -> &[LedgerEntry] {
        &self.ledger.entries[..self.synthetic_from]
    }

    pub fn synthetic_entries(&self) -> &[LedgerEntry] {
        &self.ledger.entries[self.synthetic_from..]
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.ledger.last().map(|e| e.date)
    }
}

pub fn extend(ledger: Ledger, to_date: NaiveDate, step_days: u32) -> Result<ExtendedLedger, DcaError> {
    if step_days == 0 {
        return Err(DcaError::InvalidStep);
    }

    let synthetic_from = ledger.len();
    let Some(last) = ledger.last().copied() else {
        return Ok(ExtendedLedger {
            ledger,
            synthetic_from,
        });
    };

    let step = Duration::days(step_days as i64);
    let flat = |date: NaiveDate| LedgerEntry {
        date,
        shares_bought: 0.0,
        ..last
    };

    let mut ledger = ledger;
    // Steps past the end of the calendar stop the walk; `to_date` is still appended.
    let mut next = last.date.checked_add_signed(step);
    while let Some(date) = next.filter(|d| *d < to_date) {
        ledger.entries.push(flat(date));
        next = date.checked_add_signed(step);
    }
    if to_date > last.date {
        ledger.entries.push(flat(to_date));
    }

    Ok(ExtendedLedger {
        ledger,
        synthetic_from,
    })
}
