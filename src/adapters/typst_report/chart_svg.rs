//! SVG chart rendering for reports.
//!
//! One combined line chart: portfolio value (solid) and cumulative investment
//! (dashed) for every completed cadence on a shared date axis, with an
//! annotation box of summary figures per cadence.

use chrono::NaiveDate;

use crate::adapters::console_report::{fmt_currency, summary_lines};
use crate::domain::ledger::LedgerEntry;
use crate::domain::pipeline::{CadenceRun, RunReport};

const CHART_WIDTH: f64 = 1000.0;
const CHART_HEIGHT: f64 = 560.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 300.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;

/// (value line, investment line, annotation) colours, cycled per cadence.
const PALETTE: [(&str, &str, &str); 3] = [
    ("#1f77b4", "#ff7f0e", "blue"),
    ("#2ca02c", "#d62728", "green"),
    ("#9467bd", "#8c564b", "purple"),
];

struct Frame {
    start: NaiveDate,
    end: NaiveDate,
    span_days: f64,
    max_value: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.start).num_days() as f64;
        MARGIN_LEFT + offset / self.span_days * Self::plot_width()
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() - value / self.max_value * Self::plot_height()
    }

    fn path(&self, entries: &[LedgerEntry], value: impl Fn(&LedgerEntry) -> f64) -> String {
        let mut data = String::new();
        for (i, entry) in entries.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            data.push_str(&format!(
                "{} {:.1} {:.1}",
                cmd,
                self.x(entry.date),
                self.y(value(entry))
            ));
        }
        data
    }
}

fn frame(runs: &[&CadenceRun]) -> Option<Frame> {
    let entries = || runs.iter().flat_map(|r| r.extended.entries());
    let start = entries().map(|e| e.date).min()?;
    let end = entries().map(|e| e.date).max()?;
    let max_value = entries()
        .map(|e| e.portfolio_value.max(e.cumulative_investment))
        .fold(0.0_f64, f64::max);

    Some(Frame {
        start,
        end,
        span_days: ((end - start).num_days() as f64).max(1.0),
        max_value: if max_value > 0.0 { max_value } else { 1.0 },
    })
}

/// Render the combined chart, or an empty string when nothing completed.
pub fn generate_dca_svg(report: &RunReport) -> String {
    let runs: Vec<&CadenceRun> = report.completed().collect();
    let Some(frame) = frame(&runs) else {
        return String::new();
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" font-family="sans-serif">"##,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"25\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\" fill=\"darkslategray\">Dollar Cost Averaging Portfolio Over Time ({})</text>\n",
        MARGIN_LEFT + Frame::plot_width() / 2.0,
        escape(&report.ticker)
    ));

    // Grid and y-axis labels.
    for i in 0..=Y_TICKS {
        let value = frame.max_value * i as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"lightgray\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + Frame::plot_width(),
            y
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT - 5.0,
            y + 3.0,
            fmt_currency(value)
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
        frame.start
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT + Frame::plot_width(),
        CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
        frame.end
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\" font-weight=\"bold\" fill=\"darkslategray\">Date</text>\n",
        MARGIN_LEFT + Frame::plot_width() / 2.0,
        CHART_HEIGHT - 10.0
    ));

    for (i, run) in runs.iter().enumerate() {
        let (value_color, invest_color, note_color) = PALETTE[i % PALETTE.len()];
        let entries = run.extended.entries();
        let label = escape(&run.summary.label);

        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"><title>Portfolio Value ({})</title></path>\n",
            frame.path(entries, |e| e.portfolio_value),
            value_color,
            label
        ));
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"6 4\"><title>Total Investment ({})</title></path>\n",
            frame.path(entries, |e| e.cumulative_investment),
            invest_color,
            label
        ));
        for entry in run.extended.real_entries() {
            svg.push_str(&format!(
                "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"1.5\" fill=\"{}\"/>\n",
                frame.x(entry.date),
                frame.y(entry.portfolio_value),
                value_color
            ));
        }

        // Legend, top left of the plot.
        let legend_y = MARGIN_TOP + 15.0 + i as f64 * 30.0;
        svg.push_str(&format!(
            "  <line x1=\"{x}\" y1=\"{y}\" x2=\"{x2}\" y2=\"{y}\" stroke=\"{c}\" stroke-width=\"2\"/>\n  <text x=\"{tx}\" y=\"{ty}\" font-size=\"11\">Portfolio Value ({label})</text>\n",
            x = MARGIN_LEFT + 10.0,
            x2 = MARGIN_LEFT + 30.0,
            y = legend_y,
            c = value_color,
            tx = MARGIN_LEFT + 35.0,
            ty = legend_y + 4.0,
            label = label
        ));
        svg.push_str(&format!(
            "  <line x1=\"{x}\" y1=\"{y}\" x2=\"{x2}\" y2=\"{y}\" stroke=\"{c}\" stroke-width=\"2\" stroke-dasharray=\"6 4\"/>\n  <text x=\"{tx}\" y=\"{ty}\" font-size=\"11\">Total Investment ({label})</text>\n",
            x = MARGIN_LEFT + 10.0,
            x2 = MARGIN_LEFT + 30.0,
            y = legend_y + 13.0,
            c = invest_color,
            tx = MARGIN_LEFT + 35.0,
            ty = legend_y + 17.0,
            label = label
        ));

        // Annotation box to the right of the plot.
        let box_x = CHART_WIDTH - MARGIN_RIGHT + 20.0;
        let box_y = MARGIN_TOP + i as f64 * 100.0;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"70\" rx=\"8\" fill=\"white\" stroke=\"{}\"/>\n",
            box_x,
            box_y,
            MARGIN_RIGHT - 30.0,
            note_color
        ));
        for (line_no, line) in summary_lines(&run.summary).iter().enumerate() {
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"{}\">{}</text>\n",
                box_x + 10.0,
                box_y + 20.0 + line_no as f64 * 18.0,
                note_color,
                escape(line)
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
