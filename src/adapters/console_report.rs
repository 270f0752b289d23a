//! Plain-text run summary.

use std::io::{self, Write};

use crate::domain::pipeline::RunReport;
use crate::domain::summary::CadenceSummary;

pub fn fmt_currency(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn summary_lines(summary: &CadenceSummary) -> [String; 3] {
    [
        format!(
            "Total Investment ({}): {}",
            summary.label,
            fmt_currency(summary.total_investment)
        ),
        format!(
            "Final Portfolio Value ({}): {}",
            summary.label,
            fmt_currency(summary.final_value)
        ),
        format!(
            "Total Profit ({}): {}",
            summary.label,
            fmt_currency(summary.profit)
        ),
    ]
}

/// Write every cadence's figures, or the error that aborted it, in run order.
pub fn write_summary<W: Write>(out: &mut W, report: &RunReport) -> io::Result<()> {
    writeln!(
        out,
        "DCA simulation for {} ({} to {}, {} observations)",
        report.ticker, report.start_date, report.end_date, report.observations
    )?;

    for outcome in &report.outcomes {
        writeln!(out)?;
        match &outcome.result {
            Ok(run) => {
                for line in summary_lines(&run.summary) {
                    writeln!(out, "{line}")?;
                }
            }
            Err(e) => {
                writeln!(out, "Simulation failed ({}): {}", outcome.cadence.label(), e)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cadence::Cadence;
    use crate::domain::error::DcaError;
    use crate::domain::pipeline::{run_series, CadenceOutcome};
    use crate::domain::price::{PricePoint, PriceSeries};
    use crate::domain::run_config::RunConfig;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn report() -> RunReport {
        let series = PriceSeries::new(vec![
            PricePoint::new(d(2024, 1, 2), 10.0),
            PricePoint::new(d(2024, 2, 1), 20.0),
        ])
        .unwrap();
        let config = RunConfig {
            ticker: "TEST".into(),
            base_amount: 25.0,
            start_date: d(2024, 1, 1),
            end_date: d(2024, 2, 29),
            custom_cadence: "3M".parse().unwrap(),
            normalize: true,
            extend_step_days: 1,
        };
        run_series(&series, &config).unwrap()
    }

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(fmt_currency(1234.5), "$1234.50");
        assert_eq!(fmt_currency(-50.0), "$-50.00");
    }

    #[test]
    fn monthly_figures() {
        let mut out = Vec::new();
        write_summary(&mut out, &report()).unwrap();
        let text = String::from_utf8(out).unwrap();
        // 100 per month at 10 then 20: 15 shares, marked at 20.
        assert!(text.contains("Total Investment (Monthly): $200.00"));
        assert!(text.contains("Final Portfolio Value (Monthly): $300.00"));
        assert!(text.contains("Total Profit (Monthly): $100.00"));
        assert!(text.contains("Total Investment (Custom 3M): $300.00"));
    }

    #[test]
    fn failed_cadence_is_reported_inline() {
        let mut report = report();
        report.outcomes[1] = CadenceOutcome {
            cadence: Cadence::Weekly,
            result: Err(DcaError::InvalidPrice {
                date: d(2024, 1, 2),
                price: 0.0,
            }),
        };
        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Simulation failed (Weekly): invalid price 0 on 2024-01-02"));
        assert!(text.contains("Total Investment (Monthly)"));
    }
}
