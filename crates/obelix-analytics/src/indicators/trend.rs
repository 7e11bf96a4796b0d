//! 추세 지표 (Trend Indicators).
//!
//! - SMA (Simple Moving Average)

use obelix_core::PriceSeries;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult, IndicatorSeries};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// 누적 합계를 유지하며 창에서 빠지는 값을 빼므로 O(n)입니다.
    /// 창 합계가 Decimal 범위를 넘으면 [`IndicatorError::CalculationError`]를 반환합니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터
    /// * `params` - SMA 파라미터
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<IndicatorSeries> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let period_decimal = Decimal::from(period);
        let mut window_sum = Decimal::ZERO;

        for (i, price) in prices.iter().enumerate() {
            // 빠지는 값을 먼저 빼야 창 합계 이상으로 커지지 않음
            let outgoing = if i >= period {
                prices[i - period]
            } else {
                Decimal::ZERO
            };
            let next = window_sum
                .checked_sub(outgoing)
                .and_then(|sum| sum.checked_add(*price));
            window_sum = next.ok_or_else(|| {
                IndicatorError::CalculationError(format!(
                    "{}번째 가격에서 이동 합계가 Decimal 범위를 넘었습니다",
                    i
                ))
            })?;

            if i + 1 < period {
                result.push(None);
            } else {
                result.push(Some(window_sum / period_decimal));
            }
        }

        Ok(IndicatorSeries::new(result))
    }
}

/// 종가에 대한 단순 이동평균.
///
/// `window`는 1 이상, 시계열 길이 이하여야 합니다.
/// - `window == 0` → [`IndicatorError::InvalidParameter`]
/// - `window > series.len()` (빈 시계열 포함) → [`IndicatorError::InsufficientData`]
pub fn rolling_mean(series: &PriceSeries, window: usize) -> IndicatorResult<IndicatorSeries> {
    TrendIndicators::new().sma(&series.closes(), SmaParams { period: window })
}
