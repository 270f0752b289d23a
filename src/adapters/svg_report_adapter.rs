//! Standalone SVG chart adapter implementing ReportPort.

use std::fs;
use std::path::Path;

use crate::adapters::typst_report::chart_svg::generate_dca_svg;
use crate::domain::error::DcaError;
use crate::domain::pipeline::RunReport;
use crate::ports::report_port::ReportPort;

#[derive(Default)]
pub struct SvgReportAdapter;

impl SvgReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for SvgReportAdapter {
    fn write(&self, report: &RunReport, output_path: &str) -> Result<(), DcaError> {
        let svg = generate_dca_svg(report);
        if svg.is_empty() {
            tracing::warn!("no completed cadence to chart; skipping {}", output_path);
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, svg)?;
        Ok(())
    }
}
