//! Configuration validation.
//!
//! Validates every run field before any price data is fetched, and builds the
//! validated [`RunConfig`].

use crate::domain::cadence::Cadence;
use crate::domain::error::DcaError;
use crate::domain::run_config::{RunConfig, DEFAULT_EXTEND_STEP_DAYS, MAX_EXTEND_STEP_DAYS};
use crate::ports::config_port::{parse_bool, ConfigPort};
use chrono::NaiveDate;

pub const SECTION: &str = "dca";

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_ticker(config)?;
    validate_amount(config)?;
    validate_dates(config)?;
    validate_custom_interval(config)?;
    validate_normalize(config)?;
    validate_extend_step(config)?;
    Ok(())
}

pub fn build_run_config(config: &dyn ConfigPort) -> Result<RunConfig, DcaError> {
    validate_run_config(config)?;

    let run = RunConfig {
        ticker: required(config, "ticker")?.trim().to_uppercase(),
        base_amount: parse_amount(&required(config, "amount")?)?,
        start_date: parse_date(config.get_string(SECTION, "start_date").as_deref(), "start_date")?,
        end_date: parse_date(config.get_string(SECTION, "end_date").as_deref(), "end_date")?,
        custom_cadence: required(config, "custom_interval")?.parse()?,
        normalize: parse_normalize(config)?,
        extend_step_days: parse_extend_step(config)?,
    };
    run.validate()?;
    Ok(run)
}

fn required(config: &dyn ConfigPort, key: &str) -> Result<String, DcaError> {
    config
        .get_string(SECTION, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DcaError::ConfigMissing {
            section: SECTION.to_string(),
            key: key.to_string(),
        })
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), DcaError> {
    required(config, "ticker").map(|_| ())
}

fn validate_amount(config: &dyn ConfigPort) -> Result<(), DcaError> {
    parse_amount(&required(config, "amount")?).map(|_| ())
}

fn parse_amount(value: &str) -> Result<f64, DcaError> {
    let amount: f64 = value.trim().parse().map_err(|_| DcaError::ConfigInvalid {
        section: SECTION.to_string(),
        key: "amount".to_string(),
        reason: format!("'{}' is not a number", value.trim()),
    })?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DcaError::ConfigInvalid {
            section: SECTION.to_string(),
            key: "amount".to_string(),
            reason: "amount must be positive".to_string(),
        });
    }
    Ok(amount)
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let start_str = config.get_string(SECTION, "start_date");
    let end_str = config.get_string(SECTION, "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(DcaError::ConfigInvalid {
            section: SECTION.to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, DcaError> {
    match value {
        None => Err(DcaError::ConfigMissing {
            section: SECTION.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            DcaError::ConfigInvalid {
                section: SECTION.to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

fn validate_custom_interval(config: &dyn ConfigPort) -> Result<(), DcaError> {
    required(config, "custom_interval")?.parse::<Cadence>().map(|_| ())
}

fn validate_normalize(config: &dyn ConfigPort) -> Result<(), DcaError> {
    parse_normalize(config).map(|_| ())
}

/// Defaults to `true` when absent; anything but a recognised boolean is rejected.
fn parse_normalize(config: &dyn ConfigPort) -> Result<bool, DcaError> {
    let Some(raw) = config.get_string(SECTION, "normalize") else {
        return Ok(true);
    };
    parse_bool(&raw).ok_or_else(|| DcaError::ConfigInvalid {
        section: SECTION.to_string(),
        key: "normalize".to_string(),
        reason: format!("'{}' is not a boolean (true/false, yes/no, 1/0)", raw.trim()),
    })
}

fn validate_extend_step(config: &dyn ConfigPort) -> Result<(), DcaError> {
    parse_extend_step(config).map(|_| ())
}

fn parse_extend_step(config: &dyn ConfigPort) -> Result<u32, DcaError> {
    let Some(raw) = config.get_string(SECTION, "extend_step_days") else {
        return Ok(DEFAULT_EXTEND_STEP_DAYS);
    };
    let invalid = |reason: String| DcaError::ConfigInvalid {
        section: SECTION.to_string(),
        key: "extend_step_days".to_string(),
        reason,
    };
    let step: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a whole number of days", raw.trim())))?;
    if !(1..=MAX_EXTEND_STEP_DAYS).contains(&step) {
        return Err(invalid(format!(
            "extend_step_days must be between 1 and {MAX_EXTEND_STEP_DAYS}"
        )));
    }
    Ok(step)
}
