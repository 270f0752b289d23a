//! Parameters of a single simulation run.

use chrono::NaiveDate;

use super::cadence::Cadence;
use super::error::DcaError;

pub const DEFAULT_EXTEND_STEP_DAYS: u32 = 1;
/// Upper bound on the chart tail step, one century of days.
pub const MAX_EXTEND_STEP_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub ticker: String,
    /// Weekly base contribution; other cadences scale from it when `normalize`.
    pub base_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub custom_cadence: Cadence,
    pub normalize: bool,
    pub extend_step_days: u32,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), DcaError> {
        if self.ticker.trim().is_empty() {
            return Err(invalid("ticker", "ticker must not be empty"));
        }
        if !self.base_amount.is_finite() || self.base_amount <= 0.0 {
            return Err(invalid("amount", "amount must be positive"));
        }
        if self.start_date > self.end_date {
            return Err(invalid("start_date", "start_date must not be after end_date"));
        }
        if !(1..=MAX_EXTEND_STEP_DAYS).contains(&self.extend_step_days) {
            return Err(invalid(
                "extend_step_days",
                &format!("extend_step_days must be between 1 and {MAX_EXTEND_STEP_DAYS}"),
            ));
        }
        self.custom_cadence.period()?;
        Ok(())
    }

    /// Cadences simulated per run, in report order.
    pub fn cadences(&self) -> [Cadence; 3] {
        [Cadence::Monthly, Cadence::Weekly, self.custom_cadence]
    }

    pub fn contribution_for(&self, cadence: &Cadence) -> Result<f64, DcaError> {
        if self.normalize {
            cadence.normalized_contribution(self.base_amount)
        } else {
            cadence.period()?;
            Ok(self.base_amount)
        }
    }
}

fn invalid(key: &str, reason: &str) -> DcaError {
    DcaError::ConfigInvalid {
        section: "dca".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
