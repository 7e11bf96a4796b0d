//! 전략 공통 유틸리티.

pub mod signal_filters;

use obelix_core::{Signal, SignalSeries};
use serde::Serialize;

pub use signal_filters::{suppress_repeated_sells, LastAction};

/// 마지막 실행 통계 (`get_state` 출력용).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// 입력 봉 수
    pub input_bars: usize,
    /// 결과 행 수
    pub output_rows: usize,
    /// 매수 신호 수
    pub buy_signals: usize,
    /// 매도 신호 수
    pub sell_signals: usize,
    /// 제거된 봉 수 (워밍업 + 라벨 불가 구간)
    pub dropped_rows: usize,
    /// 마지막 방향성 신호
    pub last_actionable: Option<Signal>,
}

impl RunStats {
    pub fn collect(input_bars: usize, output: &SignalSeries) -> Self {
        Self {
            input_bars,
            output_rows: output.len(),
            dropped_rows: input_bars.saturating_sub(output.len()),
            buy_signals: output.count(Signal::Buy),
            sell_signals: output.count(Signal::Sell),
            last_actionable: output
                .iter()
                .rev()
                .map(|p| p.signal)
                .find(Signal::is_actionable),
        }
    }
}
