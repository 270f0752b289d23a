//! CSV file price data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. The header row must name a `date` column
//! and a `close` column (`adj close` is accepted when `close` is absent);
//! other columns are ignored, so plain OHLCV exports load unchanged.

use crate::domain::error::DcaError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn column_indices(headers: &csv::StringRecord) -> Result<(usize, usize), DcaError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("date").ok_or_else(|| DcaError::DataSource {
            reason: "missing date column".into(),
        })?;
        let close = find("close")
            .or_else(|| find("adj close"))
            .ok_or_else(|| DcaError::DataSource {
                reason: "missing close column".into(),
            })?;
        Ok((date, close))
    }
}

impl PriceDataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError> {
        let path = self.csv_path(ticker);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no price file for ticker");
                return Ok(PriceSeries::empty());
            }
            Err(e) => {
                return Err(DcaError::DataSource {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DcaError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let (date_idx, close_idx) = Self::column_indices(headers)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DcaError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                DcaError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let close_str = record.get(close_idx).unwrap_or_default().trim();
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                tracing::debug!(%date, "skipping row without close");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| DcaError::DataSource {
                reason: format!("invalid close value '{}' on {}: {}", close_str, date, e),
            })?;

            points.push(PricePoint::new(date, close));
        }

        PriceSeries::from_unsorted(points)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let ohlcv = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("BHP.csv"), ohlcv).unwrap();

        fs::write(
            path.join("SPY.csv"),
            "Date,Adj Close\n2024-02-01,480.5\n2024-02-02,\n2024-02-05,490.25\n",
        )
        .unwrap();
        fs::write(path.join("BAD.csv"), "date,close\n2024-02-01,abc\n").unwrap();
        fs::write(path.join("NOCLOSE.csv"), "date,open\n2024-02-01,1.0\n").unwrap();
        fs::write(
            path.join("DUP.csv"),
            "date,close\n2024-02-01,1.0\n2024-02-01,2.0\n",
        )
        .unwrap();

        (dir, path)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn fetch_closes_sorted() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_closes("BHP", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap();
        let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![105.0, 110.0, 115.0]);
        assert_eq!(series.first().unwrap().date, d(2024, 1, 15));
    }

    #[test]
    fn fetch_closes_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter
            .fetch_closes("BHP", d(2024, 1, 16), d(2024, 1, 16))
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().close, 110.0);
    }

    #[test]
    fn ticker_lookup_is_case_insensitive() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let series = adapter
            .fetch_closes("bhp", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn adj_close_fallback_and_blank_rows() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let series = adapter
            .fetch_closes("SPY", d(2024, 1, 1), d(2024, 12, 31))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 490.25);
    }

    #[test]
    fn missing_file_is_empty_series() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let series = adapter
            .fetch_closes("XYZ", d(2024, 1, 1), d(2024, 1, 31))
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn malformed_close_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_closes("BAD", d(2024, 1, 1), d(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, DcaError::DataSource { .. }));
    }

    #[test]
    fn missing_close_column_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_closes("NOCLOSE", d(2024, 1, 1), d(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, DcaError::DataSource { reason } if reason.contains("close")));
    }

    #[test]
    fn duplicate_dates_rejected() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter
            .fetch_closes("DUP", d(2024, 1, 1), d(2024, 12, 31))
            .unwrap_err();
        assert!(matches!(err, DcaError::DuplicateDate { .. }));
    }
}
