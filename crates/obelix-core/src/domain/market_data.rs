//! 시장 데이터 타입.
//!
//! - `PriceBar` - OHLCV 봉 한 개
//! - `PriceSeries` - 타임스탬프 오름차순으로 검증된 봉 시계열

use crate::error::{ObelixError, ObelixResult};
use crate::types::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 봉 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 봉 타임스탬프
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
}

impl PriceBar {
    /// 새 봉을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 종가만 알고 있는 봉을 생성합니다 (OHLC가 모두 종가).
    pub fn from_close(timestamp: DateTime<Utc>, close: Price) -> Self {
        Self::new(timestamp, close, close, close, close, Decimal::ZERO)
    }

    fn validate(&self, index: usize) -> ObelixResult<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if value < Decimal::ZERO {
                return Err(ObelixError::Input(format!(
                    "{}번째 봉의 {} 값이 음수입니다: {}",
                    index, name, value
                )));
            }
        }
        if self.close <= Decimal::ZERO {
            return Err(ObelixError::Input(format!(
                "{}번째 봉의 종가는 0보다 커야 합니다: {}",
                index, self.close
            )));
        }
        Ok(())
    }
}

/// 타임스탬프 오름차순의 봉 시계열.
///
/// 생성 시 다음을 검증합니다:
/// - 타임스탬프가 엄격하게 증가 (중복 없음, 간격은 허용)
/// - OHLV 값이 음수가 아님
/// - 종가가 0보다 큼
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 봉 목록을 검증하여 시계열을 생성합니다.
    pub fn new(bars: Vec<PriceBar>) -> ObelixResult<Self> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate(i)?;
        }

        for (i, pair) in bars.windows(2).enumerate() {
            if pair[0].timestamp >= pair[1].timestamp {
                return Err(ObelixError::Input(format!(
                    "타임스탬프가 오름차순이 아닙니다: {}번째 {} >= {}번째 {}",
                    i,
                    pair[0].timestamp,
                    i + 1,
                    pair[1].timestamp
                )));
            }
        }

        Ok(Self { bars })
    }

    /// 빈 시계열을 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 모든 봉을 반환합니다.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 봉 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 시계열이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 인덱스의 봉을 반환합니다.
    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    /// 첫 번째 봉을 반환합니다.
    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    /// 마지막 봉을 반환합니다.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// 봉 반복자를 반환합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, PriceBar> {
        self.bars.iter()
    }

    /// 종가 열을 반환합니다.
    pub fn closes(&self) -> Vec<Price> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = ObelixError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceBar;
    type IntoIter = std::slice::Iter<'a, PriceBar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
