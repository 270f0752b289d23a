//! Concrete adapter implementations for ports.

#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod map_config_adapter;
pub mod prompt_adapter;
pub mod console_report;
pub mod svg_report_adapter;
pub mod typst_report;
