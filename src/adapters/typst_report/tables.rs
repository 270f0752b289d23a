//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Run parameters
//! - Per-cadence summary figures
//! - Per-cadence contribution ledgers (real purchases only)

use crate::adapters::console_report::fmt_currency;
use crate::domain::ledger::LedgerEntry;
use crate::domain::pipeline::RunReport;

pub fn render_run_summary(report: &RunReport) -> String {
    let mut out = String::from("#table(\n  columns: 2,\n  align: (left, right),\n");
    out.push_str("  [*Property*], [*Value*],\n");
    out.push_str(&format!("  [Ticker], [{}],\n", escape(&report.ticker)));
    out.push_str(&format!(
        "  [Period], [{} to {}],\n",
        report.start_date, report.end_date
    ));
    out.push_str(&format!(
        "  [Weekly Base Amount], [{}],\n",
        escape(&fmt_currency(report.base_amount))
    ));
    out.push_str(&format!("  [Observations], [{}],\n", report.observations));
    out.push_str(&format!(
        "  [Final Close], [{}],\n",
        escape(&fmt_currency(report.final_price))
    ));
    out.push_str(")\n");
    out
}

pub fn render_cadence_table(report: &RunReport) -> String {
    if report.outcomes.is_empty() {
        return "_No cadences simulated._\n".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 7,\n  align: (left, right, right, right, right, right, right),\n",
    );
    out.push_str(
        "  [*Cadence*], [*Per Event*], [*Events*], [*Total Investment*], [*Final Value*], [*Total Profit*], [*Return*],\n",
    );

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(run) => {
                let s = &run.summary;
                let color = if s.profit >= 0.0 { "green" } else { "red" };
                out.push_str(&format!(
                    "  [{}], [{}], [{}], [{}], [{}], text(fill: {}, [{}]), [{:+.2}%],\n",
                    escape(&s.label),
                    escape(&fmt_currency(s.contribution)),
                    s.contributions,
                    escape(&fmt_currency(s.total_investment)),
                    escape(&fmt_currency(s.final_value)),
                    color,
                    escape(&fmt_currency(s.profit)),
                    s.return_pct * 100.0
                ));
            }
            Err(e) => {
                out.push_str(&format!(
                    "  [{}], table.cell(colspan: 6, text(fill: red, [{}])),\n",
                    escape(&outcome.cadence.label()),
                    escape(&e.to_string())
                ));
            }
        }
    }

    out.push_str(")\n");
    out
}

pub fn render_ledger_table(entries: &[LedgerEntry]) -> String {
    if entries.is_empty() {
        return "_No contributions in range._\n".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 6,\n  align: (left, right, right, right, right, right),\n",
    );
    out.push_str(
        "  [*Date*], [*Price*], [*Shares Bought*], [*Total Shares*], [*Total Investment*], [*Portfolio Value*],\n",
    );
    for e in entries {
        out.push_str(&format!(
            "  [{}], [{:.2}], [{:.4}], [{:.4}], [{:.2}], [{:.2}],\n",
            e.date.format("%Y-%m-%d"),
            e.price,
            e.shares_bought,
            e.cumulative_shares,
            e.cumulative_investment,
            e.portfolio_value
        ));
    }
    out.push_str(")\n");
    out
}

pub fn render_ledger_sections(report: &RunReport) -> String {
    let mut out = String::new();
    for run in report.completed() {
        out.push_str(&format!("== {} Contributions\n\n", escape(&run.summary.label)));
        out.push_str(&render_ledger_table(run.extended.real_entries()));
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("_No completed simulations._\n");
    }
    out
}

/// Escape characters with markup meaning inside Typst content blocks.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '#' | '[' | ']' | '*' | '_' | '@' | '<' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: u32, price: f64) -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            shares_bought: 100.0 / price,
            cumulative_shares: 100.0 / price,
            cumulative_investment: 100.0,
            portfolio_value: 100.0,
        }
    }

    #[test]
    fn escape_dollar_signs() {
        assert_eq!(escape("$12.00"), "\\$12.00");
        assert_eq!(escape("Custom 2W"), "Custom 2W");
    }

    #[test]
    fn ledger_table_rows() {
        let table = render_ledger_table(&[entry(2, 10.0), entry(9, 8.0)]);
        assert!(table.contains("#table("));
        assert!(table.contains("[2024-01-02], [10.00], [10.0000]"));
        assert!(table.contains("[2024-01-09], [8.00], [12.5000]"));
    }

    #[test]
    fn empty_ledger_table() {
        assert_eq!(render_ledger_table(&[]), "_No contributions in range._\n");
    }
}
