//! Contribution cadences and per-event amount normalization.
//!
//! A cadence is either one of the two fixed plans (monthly, weekly) or a custom
//! multiple of a week or a month, parsed from strings such as `2W` or `3M`.
//! The normalizer scales a weekly base amount so that every cadence invests at
//! a comparable annualized rate.

use std::fmt;
use std::str::FromStr;

use super::error::DcaError;

/// Weeks per month used when converting between weekly and monthly plans.
pub const WEEKS_PER_MONTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CadenceUnit {
    Week,
    Month,
}

impl CadenceUnit {
    fn suffix(self) -> char {
        match self {
            CadenceUnit::Week => 'W',
            CadenceUnit::Month => 'M',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    Monthly,
    Weekly,
    Custom { multiplier: u32, unit: CadenceUnit },
}

impl Cadence {
    pub fn custom(multiplier: u32, unit: CadenceUnit) -> Result<Self, DcaError> {
        let cadence = Cadence::Custom { multiplier, unit };
        cadence.period()?;
        Ok(cadence)
    }

    /// The period length as `(multiplier, unit)`, validating custom multipliers.
    pub fn period(&self) -> Result<(u32, CadenceUnit), DcaError> {
        match *self {
            Cadence::Monthly => Ok((1, CadenceUnit::Month)),
            Cadence::Weekly => Ok((1, CadenceUnit::Week)),
            Cadence::Custom { multiplier, unit } => {
                if multiplier < 1 {
                    return Err(DcaError::invalid_cadence(
                        &format!("{}{}", multiplier, unit.suffix()),
                        "multiplier must be at least 1",
                    ));
                }
                Ok((multiplier, unit))
            }
        }
    }

    /// Human label used in reports: `Monthly`, `Weekly`, or `Custom` with its period.
    pub fn label(&self) -> String {
        match self {
            Cadence::Monthly => "Monthly".to_string(),
            Cadence::Weekly => "Weekly".to_string(),
            Cadence::Custom { .. } => format!("Custom {}", self),
        }
    }

    /// Per-event contribution that keeps this cadence's investment rate in line
    /// with a weekly plan investing `base_amount`.
    pub fn normalized_contribution(&self, base_amount: f64) -> Result<f64, DcaError> {
        let (multiplier, unit) = self.period()?;
        let weeks = match unit {
            CadenceUnit::Week => multiplier as f64,
            CadenceUnit::Month => WEEKS_PER_MONTH * multiplier as f64,
        };
        Ok(base_amount * weeks)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Monthly => write!(f, "1M"),
            Cadence::Weekly => write!(f, "1W"),
            Cadence::Custom { multiplier, unit } => write!(f, "{}{}", multiplier, unit.suffix()),
        }
    }
}

impl FromStr for Cadence {
    type Err = DcaError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let Some(suffix) = trimmed.chars().last() else {
            return Err(DcaError::invalid_cadence(input, "empty cadence"));
        };

        let unit = match suffix.to_ascii_uppercase() {
            'W' => CadenceUnit::Week,
            'M' => CadenceUnit::Month,
            other => {
                return Err(DcaError::invalid_cadence(
                    input,
                    format!("unsupported unit '{}'", other),
                ));
            }
        };

        let digits = &trimmed[..trimmed.len() - suffix.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DcaError::invalid_cadence(
                input,
                "multiplier must be a positive integer",
            ));
        }
        let multiplier: u32 = digits
            .parse()
            .map_err(|_| DcaError::invalid_cadence(input, "multiplier out of range"))?;
        if multiplier < 1 {
            return Err(DcaError::invalid_cadence(
                input,
                "multiplier must be at least 1",
            ));
        }

        Ok(Cadence::Custom { multiplier, unit })
    }
}
