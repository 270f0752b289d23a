//! Per-cadence summary figures.

use super::ledger::Ledger;

#[derive(Debug, Clone, PartialEq)]
pub struct CadenceSummary {
    pub label: String,
    pub contribution: f64,
    pub contributions: usize,
    pub total_investment: f64,
    pub total_shares: f64,
    pub final_value: f64,
    pub profit: f64,
    pub return_pct: f64,
}

impl CadenceSummary {
    /// Marks the ledger's accumulated shares to `final_price`, the last close of
    /// the source series.
    pub fn compute(label: &str, contribution: f64, ledger: &Ledger, final_price: f64) -> Self {
        let final_value = ledger.value_at(final_price);
        let profit = final_value - ledger.total_investment;
        let return_pct = if ledger.total_investment > 0.0 {
            profit / ledger.total_investment
        } else {
            0.0
        };

        Self {
            label: label.to_string(),
            contribution,
            contributions: ledger.len(),
            total_investment: ledger.total_investment,
            total_shares: ledger.total_shares,
            final_value,
            profit,
            return_pct,
        }
    }
}
