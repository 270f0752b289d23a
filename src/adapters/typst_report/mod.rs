//! Typst-based report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `chart_svg` and `tables`,
//! and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::Path;

use crate::domain::error::DcaError;
use crate::domain::pipeline::RunReport;
use crate::ports::report_port::ReportPort;

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, report: &RunReport) -> String {
    let mut output = template.to_string();

    output = output.replace("{{RUN_SUMMARY}}", &tables::render_run_summary(report));
    output = output.replace("{{CADENCE_TABLE}}", &tables::render_cadence_table(report));

    let svg = chart_svg::generate_dca_svg(report);
    let chart = if svg.is_empty() {
        "_No chart data._".to_string()
    } else {
        format!(
            "#image(bytes(\"{}\"), format: \"svg\", width: 100%)",
            svg.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
        )
    };
    output = output.replace("{{CHART_SVG}}", &chart);

    output = output.replace("{{LEDGER_TABLES}}", &tables::render_ledger_sections(report));

    output
}

/// Writes a `.typ` report from the built-in or a user-supplied template.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }

    pub fn from_template_file<P: AsRef<Path>>(path: P) -> Result<Self, DcaError> {
        Ok(Self::with_template(fs::read_to_string(path)?))
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, report: &RunReport, output_path: &str) -> Result<(), DcaError> {
        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| default_template::template());
        let content = resolve(template, report);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
