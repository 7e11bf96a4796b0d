//! k-NN 분류기 기반 전략.
//!
//! 이동평균 차이와 모멘텀을 feature로, 미래 수익률을 라벨로 삼아 k-NN
//! 분류기를 학습한 뒤 같은 봉들에 대해 예측한 클래스를 신호로 변환합니다.
//!
//! # 주의
//!
//! 학습과 예측이 같은 구간에서 이뤄지는 **표본 내(in-sample)** 평가입니다.
//! 라벨이 미래 가격을 사용하므로 결과 신호는 실거래 성과를 예측하지 않습니다.
//!
//! # 처리 순서
//! 1. feature 계산 후 누락 행 제거
//! 2. 마지막 `future_shift`개 행 제거 후 라벨 생성
//! 3. fit → predict (같은 행)
//! 4. 3-class 모드에서는 연속 매도 신호 정리

use obelix_core::{ObelixError, ObelixResult, PriceSeries, Signal, SignalPoint, SignalSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::common::{suppress_repeated_sells, RunStats};
use crate::ml::{
    extract_features, label_future_returns, ClassMode, KnnClassifier, Label, FEATURE_NAMES,
};
use crate::Strategy;

/// 분류기 전략 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// 단기 이동평균 기간
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    /// 장기 이동평균 기간
    #[serde(default = "default_long_window")]
    pub long_window: usize,

    /// 이웃 수 (k)
    #[serde(default = "default_neighbor_count")]
    pub neighbor_count: usize,

    /// 라벨 계산에 사용할 미래 봉 거리
    #[serde(default = "default_future_shift")]
    pub future_shift: usize,

    /// 수익률 임계값 (가격 단위)
    #[serde(default)]
    pub return_threshold: Decimal,

    /// 분류 모드 (2 또는 3)
    #[serde(default)]
    pub class_mode: ClassMode,
}

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

fn default_neighbor_count() -> usize {
    5
}

fn default_future_shift() -> usize {
    1
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
            neighbor_count: default_neighbor_count(),
            future_shift: default_future_shift(),
            return_threshold: Decimal::ZERO,
            class_mode: ClassMode::default(),
        }
    }
}

impl ClassifierConfig {
    /// 이동평균 기간을 지정해 기본 설정을 만듭니다.
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            ..Default::default()
        }
    }

    pub fn with_neighbor_count(mut self, k: usize) -> Self {
        self.neighbor_count = k;
        self
    }

    pub fn with_future_shift(mut self, shift: usize) -> Self {
        self.future_shift = shift;
        self
    }

    pub fn with_return_threshold(mut self, threshold: Decimal) -> Self {
        self.return_threshold = threshold;
        self
    }

    pub fn with_class_mode(mut self, mode: ClassMode) -> Self {
        self.class_mode = mode;
        self
    }

    /// 설정 검증.
    pub fn validate(&self) -> ObelixResult<()> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(ObelixError::Config(format!(
                "이동평균 기간은 0보다 커야 합니다 (short={}, long={})",
                self.short_window, self.long_window
            )));
        }
        if self.neighbor_count == 0 {
            return Err(ObelixError::Config(
                "이웃 수는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.future_shift == 0 {
            return Err(ObelixError::Config(
                "future_shift는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.return_threshold < Decimal::ZERO {
            return Err(ObelixError::Config(
                "수익률 임계값은 0 이상이어야 합니다".to_string(),
            ));
        }
        if self.short_window >= self.long_window {
            warn!(
                short_window = self.short_window,
                long_window = self.long_window,
                "Short window is not shorter than long window"
            );
        }
        Ok(())
    }
}

/// k-NN 분류기 전략.
#[derive(Debug)]
pub struct ClassifierStrategy {
    config: ClassifierConfig,
    model: Option<KnnClassifier<Label>>,
    last_run: Option<RunStats>,
}

impl ClassifierStrategy {
    /// 설정을 검증하고 전략을 생성합니다.
    pub fn new(config: ClassifierConfig) -> ObelixResult<Self> {
        config.validate()?;

        info!(
            short_window = config.short_window,
            long_window = config.long_window,
            neighbor_count = config.neighbor_count,
            future_shift = config.future_shift,
            class_mode = config.class_mode.class_count(),
            "Initializing k-NN classifier strategy"
        );

        Ok(Self {
            config,
            model: None,
            last_run: None,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Strategy for ClassifierStrategy {
    fn name(&self) -> &str {
        "k-NN Classifier"
    }

    fn description(&self) -> &str {
        "k-nearest-neighbors classifier over SMA difference and momentum, trained on future returns (in-sample)."
    }

    fn generate_signals(&mut self, series: &PriceSeries) -> ObelixResult<SignalSeries> {
        let config = &self.config;
        let mut rows = extract_features(series, config.short_window, config.long_window)?;

        debug!(
            dropped = series.len() - rows.len(),
            "Dropped bars with missing features"
        );

        let closes: Vec<Decimal> = rows
            .iter()
            .map(|row| series.bars()[row.index].close)
            .collect();
        let labels = label_future_returns(
            &closes,
            config.future_shift,
            config.return_threshold,
            config.class_mode,
        );

        if labels.is_empty() {
            return Err(ObelixError::InsufficientHistory {
                stage: "fit".to_string(),
                required: config.future_shift + 1,
                provided: rows.len(),
            });
        }
        rows.truncate(labels.len());

        let features: Vec<Vec<f64>> = rows.iter().map(|row| row.to_vector()).collect();

        let mut model = KnnClassifier::new(config.neighbor_count)?;
        model.fit(&features, &labels)?;

        warn!(
            rows = features.len(),
            k = model.effective_k(),
            "Classifier is evaluated on its own training rows; predictions are in-sample"
        );

        let predicted: Vec<Signal> = model
            .predict(&features)?
            .into_iter()
            .map(Signal::from)
            .collect();

        let signals = match config.class_mode {
            ClassMode::Ternary => suppress_repeated_sells(&predicted),
            ClassMode::Binary => predicted,
        };

        let points = rows
            .iter()
            .zip(signals)
            .map(|(row, signal)| {
                SignalPoint::new(series.bars()[row.index].clone(), signal)
                    .with_indicator("sma_short", row.sma_short)
                    .with_indicator("sma_long", row.sma_long)
                    .with_indicator("sma_diff", row.sma_diff)
                    .with_indicator("momentum", row.momentum)
            })
            .collect();

        let output = SignalSeries::new(points)?;
        self.model = Some(model);
        self.last_run = Some(RunStats::collect(series.len(), &output));
        Ok(output)
    }

    fn get_state(&self) -> Value {
        json!({
            "config": self.config,
            "features": FEATURE_NAMES,
            "fitted": self.model.is_some(),
            "training_rows": self.model.as_ref().map_or(0, |m| m.training_size()),
            "effective_k": self.model.as_ref().map(|m| m.effective_k()),
            "last_run": self.last_run,
        })
    }
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
            .map(|(i, c)| PriceBar::from_close(start + Duration::hours(i as i64), *c))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config: ClassifierConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClassifierConfig::default());
        assert_eq!(config.neighbor_count, 5);
        assert_eq!(config.future_shift, 1);
        assert_eq!(config.class_mode, ClassMode::Binary);
    }

    #[test]
    fn test_config_validation() {
        let reject = |config: ClassifierConfig| {
            ClassifierStrategy::new(config)
                .err()
                .map(|e| e.is_rejected_configuration())
        };

        assert_eq!(reject(ClassifierConfig::new(0, 3)), Some(true));
        assert_eq!(
            reject(ClassifierConfig::new(2, 3).with_neighbor_count(0)),
            Some(true)
        );
        assert_eq!(
            reject(ClassifierConfig::new(2, 3).with_future_shift(0)),
            Some(true)
        );
        assert_eq!(
            reject(ClassifierConfig::new(2, 3).with_return_threshold(dec!(-1))),
            Some(true)
        );
        assert_eq!(reject(ClassifierConfig::new(2, 3)), None);
    }

    #[test]
    fn test_k_one_reproduces_labels() {
        // k=1 이고 feature가 모두 다르면 예측은 학습 라벨과 같습니다.
        let closes = [
            dec!(100),
            dec!(101),
            dec!(103),
            dec!(102),
            dec!(106),
            dec!(104),
            dec!(108),
            dec!(107),
        ];
        let s = series(&closes);
        let mut strategy = ClassifierStrategy::new(
            ClassifierConfig::new(1, 2).with_neighbor_count(1),
        )
        .unwrap();

        let output = strategy.generate_signals(&s).unwrap();

        // feature: 인덱스 1..7, 마지막 한 행은 라벨 불가
        assert_eq!(output.len(), 6);
        assert_eq!(output.points()[0].timestamp(), s.bars()[1].timestamp);

        let expected: Vec<Signal> = (1..7)
            .map(|i| {
                if closes[i + 1] > closes[i] {
                    Signal::Buy
                } else {
                    Signal::Sell
                }
            })
            .collect();
        assert_eq!(output.signals(), expected);
        assert!(output.points()[0].indicator("momentum").is_some());
        assert!(output.points()[0].indicator("sma_diff").is_some());
    }

    #[test]
    fn test_ternary_mode_has_no_consecutive_sells() {
        let closes: Vec<Decimal> = [50, 49, 48, 47, 46, 45, 44, 43, 42]
            .iter()
            .map(|c| Decimal::from(*c))
            .collect();
        let mut strategy = ClassifierStrategy::new(
            ClassifierConfig::new(1, 2)
                .with_neighbor_count(1)
                .with_class_mode(ClassMode::Ternary),
        )
        .unwrap();

        let output = strategy.generate_signals(&series(&closes)).unwrap();

        assert_eq!(output.count(Signal::Sell), 1);
        assert_eq!(output.signals()[0], Signal::Sell);
        assert!(output.signals()[1..].iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn test_insufficient_history_for_labels() {
        let mut strategy =
            ClassifierStrategy::new(ClassifierConfig::new(1, 2).with_future_shift(3)).unwrap();
        // feature 행 2개, shift 3 → 학습 행 없음
        let err = strategy
            .generate_signals(&series(&[dec!(10), dec!(11), dec!(12)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ObelixError::InsufficientHistory {
                required: 4,
                provided: 2,
                ..
            }
        ));
        assert!(!strategy.get_state()["fitted"].as_bool().unwrap());
    }

    #[test]
    fn test_get_state_after_fit() {
        let closes: Vec<Decimal> = (1..=12).map(|c| Decimal::from(c * 3 % 7 + 10)).collect();
        let mut strategy =
            ClassifierStrategy::new(ClassifierConfig::new(2, 3).with_neighbor_count(50)).unwrap();
        strategy.generate_signals(&series(&closes)).unwrap();

        let state = strategy.get_state();
        assert!(state["fitted"].as_bool().unwrap());
        // feature 행 10개 (인덱스 2..12) 중 마지막 행 제외
        assert_eq!(state["training_rows"], 9);
        assert_eq!(state["effective_k"], 9);
        assert_eq!(state["config"]["class_mode"], 2);
        assert_eq!(state["features"][0], "sma_diff");
        // 워밍업 2행 + 라벨 불가 1행
        assert_eq!(state["last_run"]["dropped_rows"], 3);
    }
}
