//! Run orchestration: one parameterized pipeline per cadence.
//!
//! Each cadence goes through normalize, resample, simulate, extend and
//! summarize. Cadences share only the read-only source series, and a failure
//! in one cadence is recorded in its outcome without stopping the others.

use chrono::NaiveDate;

use super::cadence::Cadence;
use super::error::DcaError;
use super::horizon::{extend, ExtendedLedger};
use super::ledger::{simulate, Ledger};
use super::price::PriceSeries;
use super::resample::resample;
use super::run_config::RunConfig;
use super::summary::CadenceSummary;
use crate::ports::data_port::PriceDataPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CadenceRun {
    pub cadence: Cadence,
    pub contribution: f64,
    pub ledger: Ledger,
    pub extended: ExtendedLedger,
    pub summary: CadenceSummary,
}

#[derive(Debug)]
pub struct CadenceOutcome {
    pub cadence: Cadence,
    pub result: Result<CadenceRun, DcaError>,
}

#[derive(Debug)]
pub struct RunReport {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub base_amount: f64,
    pub observations: usize,
    pub final_price: f64,
    pub outcomes: Vec<CadenceOutcome>,
}

impl RunReport {
    pub fn completed(&self) -> impl Iterator<Item = &CadenceRun> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Cadence, &DcaError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.cadence, e)))
    }
}

pub fn run_cadence(
    series: &PriceSeries,
    cadence: &Cadence,
    config: &RunConfig,
) -> Result<CadenceRun, DcaError> {
    let contribution = config.contribution_for(cadence)?;
    let resampled = resample(series, cadence, config.end_date)?;
    let ledger = simulate(&resampled, contribution)?;
    let final_price = series.last().ok_or(DcaError::EmptySeries)?.close;
    let summary = CadenceSummary::compute(&cadence.label(), contribution, &ledger, final_price);
    let extended = extend(ledger.clone(), config.end_date, config.extend_step_days)?;

    tracing::debug!(
        cadence = %cadence,
        contributions = ledger.len(),
        contribution,
        "simulated cadence"
    );

    Ok(CadenceRun {
        cadence: *cadence,
        contribution,
        ledger,
        extended,
        summary,
    })
}

/// Simulate every configured cadence over one price series.
pub fn run_series(series: &PriceSeries, config: &RunConfig) -> Result<RunReport, DcaError> {
    let final_price = series.last().ok_or(DcaError::EmptySeries)?.close;

    let outcomes = config
        .cadences()
        .iter()
        .map(|cadence| {
            let result = run_cadence(series, cadence, config);
            if let Err(e) = &result {
                tracing::warn!(cadence = %cadence, error = %e, "cadence simulation failed");
            }
            CadenceOutcome {
                cadence: *cadence,
                result,
            }
        })
        .collect();

    Ok(RunReport {
        ticker: config.ticker.clone(),
        start_date: config.start_date,
        end_date: config.end_date,
        base_amount: config.base_amount,
        observations: series.len(),
        final_price,
        outcomes,
    })
}

/// Fetch prices through `data_port` and simulate every configured cadence.
///
/// An empty fetch is reported as [`DcaError::NoData`].
pub fn run(data_port: &dyn PriceDataPort, config: &RunConfig) -> Result<RunReport, DcaError> {
    config.validate()?;

    tracing::info!(
        ticker = %config.ticker,
        source = data_port.name(),
        start = %config.start_date,
        end = %config.end_date,
        "fetching prices"
    );
    let series = data_port.fetch_closes(&config.ticker, config.start_date, config.end_date)?;
    if series.is_empty() {
        return Err(DcaError::NoData {
            ticker: config.ticker.clone(),
        });
    }
    tracing::info!(observations = series.len(), "prices loaded");

    run_series(&series, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use crate::domain::run_config::DEFAULT_EXTEND_STEP_DAYS;
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn config() -> RunConfig {
        RunConfig {
            ticker: "TEST".into(),
            base_amount: 10.0,
            start_date: d(2024, 1, 1),
            end_date: d(2024, 3, 31),
            custom_cadence: "2W".parse().unwrap(),
            normalize: true,
            extend_step_days: DEFAULT_EXTEND_STEP_DAYS,
        }
    }

    fn flat_series(start: NaiveDate, days: i64, close: f64) -> PriceSeries {
        PriceSeries::new(
            (0..days)
                .map(|i| PricePoint::new(start + Duration::days(i), close))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn runs_all_three_cadences_in_order() {
        let report = run_series(&flat_series(d(2024, 1, 1), 91, 50.0), &config()).unwrap();
        let labels: Vec<String> = report.completed().map(|r| r.summary.label.clone()).collect();
        assert_eq!(labels, vec!["Monthly", "Weekly", "Custom 2W"]);
        assert_eq!(report.failed().count(), 0);
        assert_eq!(report.observations, 91);
    }

    #[test]
    fn normalized_plans_invest_comparable_amounts() {
        let report = run_series(&flat_series(d(2024, 1, 1), 91, 50.0), &config()).unwrap();
        let runs: Vec<&CadenceRun> = report.completed().collect();
        // 3 months at 40, 13 weeks at 10, 7 fortnights at 20.
        assert_relative_eq!(runs[0].summary.total_investment, 120.0);
        assert_relative_eq!(runs[1].summary.total_investment, 130.0);
        assert_relative_eq!(runs[2].summary.total_investment, 140.0);
    }

    #[test]
    fn flat_prices_give_zero_profit() {
        let report = run_series(&flat_series(d(2024, 1, 1), 91, 50.0), &config()).unwrap();
        for run in report.completed() {
            assert_relative_eq!(run.summary.profit, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn extended_ledgers_share_end_date() {
        let report = run_series(&flat_series(d(2024, 1, 1), 91, 50.0), &config()).unwrap();
        for run in report.completed() {
            assert_eq!(run.extended.end_date(), Some(d(2024, 3, 31)));
        }
    }

    #[test]
    fn bad_price_fails_only_affected_cadences() {
        // 2024-01-08 opens the second week but no month or fortnight.
        let mut points: Vec<PricePoint> = (0..31)
            .map(|i| PricePoint::new(d(2024, 1, 1) + Duration::days(i), 10.0))
            .collect();
        points[7].close = 0.0;
        let series = PriceSeries::new(points).unwrap();
        let cfg = RunConfig {
            end_date: d(2024, 1, 31),
            ..config()
        };

        let report = run_series(&series, &cfg).unwrap();
        let failed: Vec<Cadence> = report.failed().map(|(c, _)| *c).collect();
        assert_eq!(failed, vec![Cadence::Weekly]);
        assert_eq!(report.completed().count(), 2);
        assert!(matches!(
            report.outcomes[1].result,
            Err(DcaError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn final_value_uses_last_close_of_series() {
        let mut points: Vec<PricePoint> = (0..40)
            .map(|i| PricePoint::new(d(2024, 1, 1) + Duration::days(i), 10.0))
            .collect();
        points.last_mut().unwrap().close = 20.0;
        let series = PriceSeries::new(points).unwrap();
        let cfg = RunConfig {
            end_date: d(2024, 2, 9),
            ..config()
        };
        let report = run_series(&series, &cfg).unwrap();
        let monthly = report.completed().next().unwrap();
        // Two monthly buys at 10 with 40 each: 8 shares worth 160.
        assert_relative_eq!(monthly.summary.total_shares, 8.0);
        assert_relative_eq!(monthly.summary.final_value, 160.0);
        assert_relative_eq!(report.final_price, 20.0);
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = run_series(&PriceSeries::empty(), &config()).unwrap_err();
        assert!(matches!(err, DcaError::EmptySeries));
    }
}
