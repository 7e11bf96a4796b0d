//! 신호 후처리 필터.
//!
//! 분류기는 봉마다 독립적으로 클래스를 예측하므로 같은 방향의 신호가
//! 연달아 나올 수 있습니다. 이 모듈은 연속된 매도 신호를 정리합니다.

use obelix_core::Signal;
use serde::{Deserialize, Serialize};

/// 마지막으로 통과한 방향성 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastAction {
    #[default]
    None,
    Buy,
    Sell,
}

impl LastAction {
    /// 신호 하나를 통과시키고 상태를 갱신합니다.
    ///
    /// - `Sell`: 직전 방향성 신호가 `Sell`이면 `Hold`로 낮춥니다.
    /// - `Buy`: 항상 통과하며 상태를 갱신합니다.
    /// - `Hold`, `Undefined`: 그대로 통과하며 상태를 바꾸지 않습니다.
    pub fn filter(&mut self, signal: Signal) -> Signal {
        match signal {
            Signal::Sell if *self == LastAction::Sell => Signal::Hold,
            Signal::Sell => {
                *self = LastAction::Sell;
                Signal::Sell
            }
            Signal::Buy => {
                *self = LastAction::Buy;
                Signal::Buy
            }
            other => other,
        }
    }
}

/// 보유 신호만 사이에 둔 연속 매도 신호를 제거합니다.
pub fn suppress_repeated_sells(signals: &[Signal]) -> Vec<Signal> {
    signals
        .iter()
        .scan(LastAction::default(), |last, signal| Some(last.filter(*signal)))
        .collect()
}
