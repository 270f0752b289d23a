//! Report generation port trait.

use crate::domain::error::DcaError;
use crate::domain::pipeline::RunReport;

/// Port for writing simulation reports and charts.
pub trait ReportPort {
    fn write(&self, report: &RunReport, output_path: &str) -> Result<(), DcaError>;
}
