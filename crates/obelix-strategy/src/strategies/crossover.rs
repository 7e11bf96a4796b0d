//! 단순 이동평균 크로스오버 전략.
//!
//! 단기 이동평균이 장기 이동평균 위에 있으면 매수,
//! 같거나 아래에 있으면 매도하는 추세 추종 전략입니다.
//!
//! # 전략 로직
//! - 단기 SMA > 장기 SMA 이고 직전 신호가 매수가 아니면: 매수 신호
//! - 단기 SMA <= 장기 SMA 이고 직전 신호가 매도가 아니면: 매도 신호
//! - 그 외: 신호 없음 (`Undefined`)
//!
//! 두 이동평균이 같으면 매도 쪽으로 판정합니다.

use obelix_analytics::rolling_mean;
use obelix_core::{ObelixError, ObelixResult, PriceSeries, Signal, SignalPoint, SignalSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::common::RunStats;
use crate::Strategy;

/// 크로스오버 전략 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CrossoverConfig {
    /// 단기 이동평균 기간
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    /// 장기 이동평균 기간
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

impl CrossoverConfig {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }

    /// 설정 검증.
    ///
    /// 단기 기간이 장기 기간 이상인 경우는 거부하지 않고 경고만 남깁니다.
    pub fn validate(&self) -> ObelixResult<()> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(ObelixError::Config(format!(
                "이동평균 기간은 0보다 커야 합니다 (short={}, long={})",
                self.short_window, self.long_window
            )));
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

    /// 두 이동평균이 모두 정의되기 전까지 제거되는 봉 수.
    pub fn warmup(&self) -> usize {
        self.short_window.max(self.long_window).saturating_sub(1)
    }
}

/// 직전에 발생한 신호를 기억하며 한 봉씩 판정하는 상태 기계.
#[derive(Debug, Clone, Copy, Default)]
struct CrossoverState {
    previous: Signal,
}

impl CrossoverState {
    fn step(&mut self, short: Decimal, long: Decimal) -> Signal {
        let signal = if short > long {
            if self.previous != Signal::Buy {
                Signal::Buy
            } else {
                Signal::Undefined
            }
        } else if self.previous != Signal::Sell {
            Signal::Sell
        } else {
            Signal::Undefined
        };

        if signal.is_actionable() {
            self.previous = signal;
        }
        signal
    }
}

/// SMA 크로스오버 전략.
#[derive(Debug)]
pub struct CrossoverStrategy {
    config: CrossoverConfig,
    last_run: Option<RunStats>,
}

impl CrossoverStrategy {
    /// 설정을 검증하고 전략을 생성합니다.
    pub fn new(config: CrossoverConfig) -> ObelixResult<Self> {
        config.validate()?;

        info!(
            short_window = config.short_window,
            long_window = config.long_window,
            "Initializing SMA Crossover strategy"
        );

        Ok(Self {
            config,
            last_run: None,
        })
    }

    pub fn config(&self) -> &CrossoverConfig {
        &self.config
    }
}

impl Strategy for CrossoverStrategy {
    fn name(&self) -> &str {
        "SMA Crossover"
    }

    fn description(&self) -> &str {
        "Simple Moving Average crossover strategy. Buy when the short SMA is above the long SMA, sell otherwise."
    }

    fn generate_signals(&mut self, series: &PriceSeries) -> ObelixResult<SignalSeries> {
        let sma_short = rolling_mean(series, self.config.short_window)?;
        let sma_long = rolling_mean(series, self.config.long_window)?;

        let mut state = CrossoverState::default();
        let mut points = Vec::with_capacity(series.len());

        for (i, bar) in series.iter().enumerate() {
            let (Some(short), Some(long)) = (sma_short.get(i), sma_long.get(i)) else {
                continue;
            };

            let signal = state.step(short, long);
            if signal.is_actionable() {
                debug!(
                    signal = %signal,
                    timestamp = %bar.timestamp,
                    short_sma = %short,
                    long_sma = %long,
                    "Crossover signal"
                );
            }

            points.push(
                SignalPoint::new(bar.clone(), signal)
                    .with_indicator("sma_short", short)
                    .with_indicator("sma_long", long),
            );
        }

        debug!(
            dropped = series.len() - points.len(),
            "Dropped warm-up bars"
        );

        let output = SignalSeries::new(points)?;
        self.last_run = Some(RunStats::collect(series.len(), &output));
        Ok(output)
    }

    fn get_state(&self) -> Value {
        json!({
            "short_window": self.config.short_window,
            "long_window": self.config.long_window,
            "warmup": self.config.warmup(),
            "last_run": self.last_run,
        })
    }
}
