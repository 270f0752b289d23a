//! Core domain types and logic.

pub mod price;
pub mod cadence;
pub mod resample;
pub mod ledger;
pub mod horizon;
pub mod summary;
pub mod run_config;
pub mod config_validation;
pub mod pipeline;
pub mod error;
