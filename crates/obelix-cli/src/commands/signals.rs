//! 신호 생성 명령어.

use anyhow::{Context, Result};
use obelix_core::{PriceSeries, Signal, SignalSeries};
use obelix_strategy::StrategyConfig;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// 신호 생성 결과.
#[derive(Debug, Serialize)]
pub struct SignalsOutput {
    pub strategy: String,
    pub strategy_state: Value,
    pub signals: SignalSeries,
}

impl SignalsOutput {
    /// 매수/매도 신호 개수 요약 한 줄.
    pub fn headline(&self) -> String {
        format!(
            "{}: {} rows, {} buy, {} sell",
            self.strategy,
            self.signals.len(),
            self.signals.count(Signal::Buy),
            self.signals.count(Signal::Sell)
        )
    }
}

/// 전략을 만들고 신호만 생성합니다.
pub fn generate(config: &StrategyConfig, series: &PriceSeries) -> Result<SignalsOutput> {
    let mut strategy = config.build().context("Failed to build strategy")?;
    let signals = strategy
        .generate_signals(series)
        .with_context(|| format!("{} failed to generate signals", strategy.name()))?;

    info!(
        strategy = strategy.name(),
        input_bars = series.len(),
        rows = signals.len(),
        "Signals generated"
    );

    Ok(SignalsOutput {
        strategy: strategy.name().to_string(),
        strategy_state: strategy.get_state(),
        signals,
    })
}
