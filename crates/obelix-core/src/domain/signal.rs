//! 전략의 매매 신호.
//!
//! - `Signal` - 봉 하나에 부착되는 매매 신호 값
//! - `SignalPoint` - 원본 봉 + 신호 + 전략이 계산한 지표 열
//! - `SignalSeries` - 신호가 부착된 시계열 (워밍업 행이 제거되어 입력보다 짧을 수 있음)

use crate::domain::{PriceBar, PriceSeries};
use crate::error::{ObelixError, ObelixResult};
use crate::types::Price;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 봉 하나에 대한 매매 신호.
///
/// `Hold`는 "보유 유지"라는 명시적 판단이고, `Undefined`는 해당 봉에
/// 새로운 신호가 없음을 뜻합니다. 둘 다 백테스터에서는 아무 동작도 하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 보유 유지
    Hold,
    /// 신호 없음
    #[default]
    Undefined,
}

impl Signal {
    /// 매수/매도처럼 실행 가능한 신호인지 확인합니다.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Signal::Buy | Signal::Sell)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Undefined => write!(f, "-"),
        }
    }
}

/// 신호가 부착된 봉 한 개.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    /// 원본 봉
    pub bar: PriceBar,
    /// 신호
    pub signal: Signal,
    /// 전략이 추가한 파생 열 (예: "sma_short", "sma_long")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub indicators: BTreeMap<String, Decimal>,
}

impl SignalPoint {
    /// 새 신호 행을 생성합니다.
    pub fn new(bar: PriceBar, signal: Signal) -> Self {
        Self {
            bar,
            signal,
            indicators: BTreeMap::new(),
        }
    }

    /// 파생 열을 추가합니다.
    pub fn with_indicator(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.indicators.insert(name.into(), value);
        self
    }

    /// 파생 열 값을 반환합니다.
    pub fn indicator(&self, name: &str) -> Option<Decimal> {
        self.indicators.get(name).copied()
    }

    /// 봉 타임스탬프.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.bar.timestamp
    }

    /// 봉 종가.
    pub fn close(&self) -> Price {
        self.bar.close
    }
}

/// 신호가 부착된 시계열.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SignalPoint>", into = "Vec<SignalPoint>")]
pub struct SignalSeries {
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    /// 신호 행 목록을 검증하여 시계열을 생성합니다.
    ///
    /// 봉 검증 규칙은 [`PriceSeries::new`]와 같습니다.
    pub fn new(points: Vec<SignalPoint>) -> ObelixResult<Self> {
        let bars: Vec<PriceBar> = points.iter().map(|p| p.bar.clone()).collect();
        PriceSeries::new(bars)?;
        Ok(Self { points })
    }

    /// 가격 시계열과 같은 길이의 신호 목록을 짝지어 시계열을 생성합니다.
    pub fn from_parts(series: &PriceSeries, signals: Vec<Signal>) -> ObelixResult<Self> {
        if series.len() != signals.len() {
            return Err(ObelixError::Input(format!(
                "신호 개수({})가 봉 개수({})와 다릅니다",
                signals.len(),
                series.len()
            )));
        }

        let points = series
            .iter()
            .cloned()
            .zip(signals)
            .map(|(bar, signal)| SignalPoint::new(bar, signal))
            .collect();

        Ok(Self { points })
    }

    /// 모든 행을 반환합니다.
    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    /// 행 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 행 반복자를 반환합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, SignalPoint> {
        self.points.iter()
    }

    /// 신호 열을 반환합니다.
    pub fn signals(&self) -> Vec<Signal> {
        self.points.iter().map(|p| p.signal).collect()
    }

    /// 특정 신호의 개수를 반환합니다.
    pub fn count(&self, signal: Signal) -> usize {
        self.points.iter().filter(|p| p.signal == signal).count()
    }

    /// 마지막 행의 종가를 반환합니다.
    pub fn last_close(&self) -> Option<Price> {
        self.points.last().map(|p| p.bar.close)
    }

    /// 신호를 제외한 가격 시계열을 반환합니다.
    pub fn to_price_series(&self) -> PriceSeries {
        // 생성 시 이미 검증된 봉이므로 그대로 옮깁니다.
        let bars = self.points.iter().map(|p| p.bar.clone()).collect();
        PriceSeries::new(bars).unwrap_or_default()
    }
}

impl TryFrom<Vec<SignalPoint>> for SignalSeries {
    type Error = ObelixError;

    fn try_from(points: Vec<SignalPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<SignalSeries> for Vec<SignalPoint> {
    fn from(series: SignalSeries) -> Self {
        series.points
    }
}

impl<'a> IntoIterator for &'a SignalSeries {
    type Item = &'a SignalPoint;
    type IntoIter = std::slice::Iter<'a, SignalPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
