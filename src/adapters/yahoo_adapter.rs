//! Yahoo Finance price data adapter.
//!
//! Fetches daily closes from Yahoo's v8 chart API with a blocking client.
//! Transient failures (timeouts, connection errors, 429 and 5xx responses) are
//! retried with exponential backoff. An unknown symbol yields an empty series.

use crate::domain::error::DcaError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::PriceDataPort;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use reqwest::Url;
use std::time::Duration;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, DcaError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) dcasim")
            .build()
            .map_err(|e| DcaError::DataSource {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Chart URL with `ticker` as one percent-encoded path segment, so symbols
    /// like `^GSPC` or `BRK/B` stay intact.
    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Url, DcaError> {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(start_ts);

        let invalid = |reason: String| DcaError::DataSource { reason };
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| invalid(format!("base URL {} cannot take a path", self.base_url)))?
            .push(ticker);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d");
        Ok(url)
    }

    fn parse_response(ticker: &str, resp: ChartResponse) -> Result<PriceSeries, DcaError> {
        let Some(results) = resp.chart.result else {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => {
                    tracing::warn!(ticker, "symbol not found");
                    Ok(PriceSeries::empty())
                }
                Some(err) => Err(DcaError::DataSource {
                    reason: format!("{}: {}", err.code, err.description),
                }),
                None => Err(DcaError::DataSource {
                    reason: "empty result with no error".into(),
                }),
            };
        };

        let Some(data) = results.into_iter().next() else {
            return Ok(PriceSeries::empty());
        };
        let Some(timestamps) = data.timestamp else {
            return Ok(PriceSeries::empty());
        };
        let closes = data
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let mut points = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| DcaError::DataSource {
                    reason: format!("invalid timestamp: {}", ts),
                })?;
            // Holidays and halted sessions come back as nulls.
            if let Some(close) = closes.get(i).copied().flatten() {
                points.push(PricePoint::new(date, close));
            }
        }

        PriceSeries::from_unsorted(points)
    }

    fn fetch_with_retry(&self, url: &Url) -> Result<ChartResponse, DcaError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, "retrying price request");
                std::thread::sleep(delay);
            }

            match self.client.get(url.clone()).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = Some(format!("HTTP {}", status));
                        continue;
                    }
                    // 404 still carries a chart error body.
                    if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
                        return Err(DcaError::DataSource {
                            reason: format!("HTTP {}", status),
                        });
                    }
                    return resp.json().map_err(|e| DcaError::DataSource {
                        reason: format!("failed to parse response: {}", e),
                    });
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(e.to_string());
                }
                Err(e) => {
                    return Err(DcaError::DataSource {
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(DcaError::DataSource {
            reason: last_error.unwrap_or_else(|| "max retries exceeded".into()),
        })
    }
}

impl PriceDataPort for YahooAdapter {
    fn fetch_closes(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DcaError> {
        let url = self.chart_url(ticker, start_date, end_date)?;
        let resp = self.fetch_with_retry(&url)?;
        let series = Self::parse_response(ticker, resp)?;

        // Yahoo may return a trailing intraday bar past the requested range.
        let points = series
            .points()
            .iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .copied()
            .collect();
        PriceSeries::new(points)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PriceSeries, DcaError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooAdapter::parse_response("TEST", resp)
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC
        let json = r#"{"chart":{"result":[{"timestamp":[1704205800,1704292200,1704378600],
            "indicators":{"quote":[{"close":[185.64,null,181.91]}]}}],"error":null}}"#;
        let series = parse(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(series.last().unwrap().close, 181.91);
    }

    #[test]
    fn not_found_is_empty() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn other_chart_error_is_data_source_error() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        assert!(matches!(parse(json), Err(DcaError::DataSource { .. })));
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        assert!(parse(json).unwrap().is_empty());
    }

    #[test]
    fn chart_url_covers_whole_end_day() {
        let adapter = YahooAdapter::new().unwrap();
        let url = adapter
            .chart_url(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap();
        assert!(url
            .as_str()
            .ends_with("/AAPL?period1=1704067200&period2=1704153599&interval=1d"));
    }

    #[test]
    fn chart_url_encodes_special_symbols() {
        let adapter = YahooAdapter::new().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let index = adapter.chart_url("^GSPC", day, day).unwrap();
        assert_eq!(index.path_segments().unwrap().last(), Some("^GSPC"));
        assert!(index.path().starts_with("/v8/finance/chart/"));

        let class_b = adapter.chart_url("BRK/B", day, day).unwrap();
        assert_eq!(class_b.path(), "/v8/finance/chart/BRK%2FB");
        assert_eq!(class_b.query(), Some("period1=1704067200&period2=1704153599&interval=1d"));
    }
}
