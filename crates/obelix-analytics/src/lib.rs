//! 지표 및 백테스팅 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (이동평균, 변화율)
//! - 단일 자산 올인/올아웃 백테스팅 엔진
//! - 자산 곡선 (낙폭, 수익률)
//!
//! # Re-exports
//!
//! - [`indicators`]: `rolling_mean`, `pct_change`, `IndicatorSeries`
//! - [`backtest`]: `Backtester`, `BacktestConfig`, `BacktestReport`
//! - [`portfolio`]: `EquityCurve`, `EquityPoint`

pub mod backtest;
pub mod indicators;
pub mod portfolio;

// Indicators 모듈 re-exports
pub use indicators::{
    pct_change, rolling_mean, IndicatorError, IndicatorResult, IndicatorSeries, SmaParams,
    TrendIndicators,
};

// Backtest 모듈 re-exports
pub use backtest::{
    BacktestConfig, BacktestError, BacktestReport, BacktestResult, Backtester, ExecutedTrade,
    TradeSide,
};

// Portfolio 모듈 re-exports
pub use portfolio::{EquityCurve, EquityPoint};
