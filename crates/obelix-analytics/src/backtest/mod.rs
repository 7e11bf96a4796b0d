//! 백테스팅 모듈
//!
//! 신호가 부착된 시계열을 한 번 순회하며 현금/보유 수량을 시뮬레이션합니다.
//!
//! # 주요 구성요소
//!
//! - [`BacktestConfig`]: 백테스트 설정 (초기 자본, 수수료)
//! - [`Backtester`]: 백테스트 실행 엔진
//! - [`BacktestReport`]: 백테스트 결과 리포트

pub mod engine;

pub use engine::{
    BacktestConfig, BacktestError, BacktestReport, BacktestResult, Backtester, ExecutedTrade,
    TradeSide,
};
