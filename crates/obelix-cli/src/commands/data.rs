//! CSV 가격 데이터 로더.
//!
//! 헤더가 있는 `timestamp,open,high,low,close,volume` 형식을 읽습니다.
//! 타임스탬프는 다음 중 하나를 허용합니다:
//! - 밀리초 단위 Unix epoch (거래소 OHLCV 응답 형식)
//! - RFC 3339 (`2024-01-01T00:00:00Z`)
//! - 날짜 (`2024-01-01`, UTC 자정)
//!
//! `volume` 열은 생략하거나 비워둘 수 있습니다.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use obelix_core::{PriceBar, PriceSeries};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: String,
    high: String,
    low: String,
    close: String,
    #[serde(default)]
    volume: String,
}

impl CsvRow {
    fn into_bar(self) -> Result<PriceBar> {
        let volume = if self.volume.is_empty() {
            Decimal::ZERO
        } else {
            parse_decimal("volume", &self.volume)?
        };

        Ok(PriceBar::new(
            parse_timestamp(&self.timestamp)?,
            parse_decimal("open", &self.open)?,
            parse_decimal("high", &self.high)?,
            parse_decimal("low", &self.low)?,
            parse_decimal("close", &self.close)?,
            volume,
        ))
    }
}

fn parse_decimal(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .with_context(|| format!("Invalid {column} value: {value:?}"))
}

/// 타임스탬프 문자열을 UTC 시각으로 변환합니다.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = value
            .parse()
            .with_context(|| format!("Invalid epoch timestamp: {value}"))?;
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| anyhow!("Epoch timestamp out of range: {value}"));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| anyhow!("Unrecognized timestamp: {value:?}"))
}

/// 리더에서 가격 시계열을 읽습니다.
pub fn read_price_series<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for (i, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // 헤더가 1행이므로 데이터는 2행부터
        let line = i + 2;
        let row = record.with_context(|| format!("Malformed CSV row at line {line}"))?;
        bars.push(row.into_bar().with_context(|| format!("Line {line}"))?);
    }

    Ok(PriceSeries::new(bars)?)
}

/// CSV 파일에서 가격 시계열을 로드합니다.
pub fn load_price_series(path: &Path) -> Result<PriceSeries> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Price data file not found: {}", path.display()))?;
    let series = read_price_series(file)
        .with_context(|| format!("Failed to read price data from {}", path.display()))?;

    info!(
        path = %path.display(),
        bars = series.len(),
        "Loaded price series"
    );
    Ok(series)
}
