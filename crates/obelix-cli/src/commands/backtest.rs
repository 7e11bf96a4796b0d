//! 백테스트 명령어.
//!
//! 설정된 전략으로 신호를 생성한 뒤 백테스터로 자산 곡선을 계산합니다.

use anyhow::{Context, Result};
use obelix_analytics::{BacktestReport, Backtester};
use obelix_core::{PriceSeries, SignalSeries};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;

/// 한 번의 실행 결과. JSON 출력의 최상위 구조입니다.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    /// 표시용 심볼
    pub symbol: Option<String>,
    /// 전략 이름
    pub strategy: String,
    /// 실행 후 전략 상태
    pub strategy_state: Value,
    /// 신호와 지표가 부착된 시계열
    pub signals: SignalSeries,
    /// 백테스트 리포트
    pub report: BacktestReport,
}

impl RunOutput {
    /// 텍스트 요약 (전략 헤더 + 리포트 요약).
    pub fn summary(&self) -> String {
        let symbol = self.symbol.as_deref().unwrap_or("-");
        format!(
            "전략: {}\n심볼: {}\n매수 신호: {} / 매도 신호: {}\n\n{}",
            self.strategy,
            symbol,
            self.signals.count(obelix_core::Signal::Buy),
            self.signals.count(obelix_core::Signal::Sell),
            self.report.summary()
        )
    }
}

/// 신호를 생성하고 백테스트를 실행합니다.
pub fn run_backtest(config: &AppConfig, series: &PriceSeries) -> Result<RunOutput> {
    let mut strategy = config
        .strategy
        .build()
        .context("Failed to build strategy")?;

    let signals = strategy
        .generate_signals(series)
        .with_context(|| format!("{} failed to generate signals", strategy.name()))?;

    let backtester =
        Backtester::new(config.backtest.clone()).context("Invalid backtest configuration")?;
    let report = backtester.run(&signals);

    info!(
        strategy = strategy.name(),
        rows = signals.len(),
        return_pct = %report.total_return_pct().round_dp(2),
        "Backtest run finished"
    );

    Ok(RunOutput {
        symbol: config.data.symbol.clone(),
        strategy: strategy.name().to_string(),
        strategy_state: strategy.get_state(),
        signals,
        report,
    })
}

/// 결과를 파일로 저장합니다. 확장자가 `.json`이면 JSON, 그 외에는 텍스트 요약.
pub fn save_output(output: &RunOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(output)?
    } else {
        output.summary()
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output to {}", path.display()))?;
    info!(path = %path.display(), "Saved backtest output");
    Ok(())
}
