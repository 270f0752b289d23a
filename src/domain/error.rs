//! Domain error types.

use chrono::NaiveDate;

/// Format hint shown whenever a cadence string is rejected.
pub const CADENCE_FORMAT_HINT: &str = "<positive integer><W|M>, e.g. 2W or 3M";

/// Top-level error type for dcasim.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("invalid cadence '{input}': {reason} (expected {CADENCE_FORMAT_HINT})")]
    InvalidCadence { input: String, reason: String },

    #[error("invalid price {price} on {date}")]
    InvalidPrice { date: NaiveDate, price: f64 },

    #[error("invalid contribution amount {amount}: must be a positive number")]
    InvalidAmount { amount: f64 },

    #[error("invalid extension step: step_days must be at least 1")]
    InvalidStep,

    #[error("price series out of order: {date} follows {previous}")]
    UnorderedSeries { previous: NaiveDate, date: NaiveDate },

    #[error("duplicate price observation for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("No data found for ticker: {ticker}")]
    NoData { ticker: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DcaError {
    pub fn invalid_cadence(input: &str, reason: impl Into<String>) -> Self {
        DcaError::InvalidCadence {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. }
            | DcaError::InvalidCadence { .. }
            | DcaError::InvalidAmount { .. }
            | DcaError::InvalidStep => 2,
            DcaError::DataSource { .. } => 3,
            DcaError::NoData { .. } | DcaError::EmptySeries => 5,
            DcaError::InvalidPrice { .. }
            | DcaError::UnorderedSeries { .. }
            | DcaError::DuplicateDate { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
