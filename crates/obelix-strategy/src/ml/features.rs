//! 분류기 입력 feature 추출.
//!
//! 봉마다 두 개의 feature를 계산합니다:
//! - `sma_diff`: 단기 SMA - 장기 SMA
//! - `momentum`: 직전 봉 대비 종가 변화율
//!
//! 어느 하나라도 누락된 봉은 제외됩니다.

use obelix_analytics::{pct_change, rolling_mean};
use obelix_core::{ObelixResult, PriceSeries};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// feature 이름 (벡터 순서와 동일).
pub const FEATURE_NAMES: [&str; 2] = ["sma_diff", "momentum"];

/// 한 봉의 feature 행.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// 원본 시계열에서의 인덱스
    pub index: usize,
    pub sma_short: Decimal,
    pub sma_long: Decimal,
    pub sma_diff: Decimal,
    pub momentum: Decimal,
}

impl FeatureRow {
    /// 모델 입력 벡터.
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            self.sma_diff.to_f64().unwrap_or(0.0),
            self.momentum.to_f64().unwrap_or(0.0),
        ]
    }
}

/// 시계열에서 feature 행을 추출합니다.
///
/// 결과는 원본 순서를 유지하며, 워밍업 구간이 제거되어 입력보다 짧습니다.
pub fn extract_features(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> ObelixResult<Vec<FeatureRow>> {
    let sma_short = rolling_mean(series, short_window)?;
    let sma_long = rolling_mean(series, long_window)?;
    let momentum = pct_change(&series.closes());

    let rows = (0..series.len())
        .filter_map(|i| {
            let short = sma_short.get(i)?;
            let long = sma_long.get(i)?;
            Some(FeatureRow {
                index: i,
                sma_short: short,
                sma_long: long,
                sma_diff: short - long,
                momentum: momentum.get(i)?,
            })
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use obelix_core::PriceBar;
    use rust_decimal_macros::dec;

    fn series(closes: &[Decimal]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, c)| PriceBar::from_close(start + Duration::minutes(i as i64), *c))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn test_extract_features_drops_warmup() {
        let s = series(&[dec!(100), dec!(102), dec!(101), dec!(105), dec!(103)]);
        let rows = extract_features(&s, 2, 3).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[0].sma_diff, dec!(0.5));
        assert_eq!(rows[0].momentum, (dec!(101) - dec!(102)) / dec!(102));
        assert_eq!(rows[0].to_vector().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_window_one_still_drops_first_bar_for_momentum() {
        let s = series(&[dec!(10), dec!(11), dec!(12)]);
        let rows = extract_features(&s, 1, 1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].sma_diff, dec!(0));
    }

    #[test]
    fn test_window_longer_than_series() {
        let s = series(&[dec!(10), dec!(11)]);
        assert!(extract_features(&s, 1, 5).is_err());
    }
}
