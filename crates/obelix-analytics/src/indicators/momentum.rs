//! 모멘텀 지표.

use rust_decimal::Decimal;

use super::IndicatorSeries;

/// 직전 값 대비 변화율.
///
/// `(p[i] - p[i-1]) / p[i-1]`. 첫 값과 계산할 수 없는 위치(직전 값 0,
/// Decimal 범위 초과)는 누락입니다.
pub fn pct_change(prices: &[Decimal]) -> IndicatorSeries {
    let mut result = Vec::with_capacity(prices.len());

    if !prices.is_empty() {
        result.push(None);
    }

    for pair in prices.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        result.push((curr - prev).checked_div(prev));
    }

    IndicatorSeries::new(result)
}
