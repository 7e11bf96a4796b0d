//! 자산 곡선(Equity Curve) 데이터 모듈
//!
//! 백테스트 동안 봉마다 평가한 자산 가치를 시계열로 기록하고,
//! 고점 대비 낙폭과 초기 자본 대비 수익률을 함께 추적합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 단일 자산 곡선 데이터 포인트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 타임스탬프 (UTC)
    pub timestamp: DateTime<Utc>,

    /// 자산 가치 (현금 + 보유 수량 × 해당 봉 종가)
    pub equity: Decimal,

    /// 고점 대비 낙폭 (%)
    /// 0 이상의 값 (0 = 고점, 양수 = 하락 중)
    pub drawdown_pct: Decimal,

    /// 초기 자본 대비 수익률 (%)
    pub return_pct: Decimal,
}

/// 자산 곡선 데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    /// 초기 자본
    initial_capital: Decimal,

    /// 시계열 데이터 포인트 (시간순 정렬)
    points: Vec<EquityPoint>,

    /// 현재 고점 자산 가치
    peak_equity: Decimal,

    /// 최대 낙폭 (%)
    max_drawdown_pct: Decimal,

    /// 최대 낙폭 발생 시점
    max_drawdown_timestamp: Option<DateTime<Utc>>,
}

impl EquityCurve {
    /// 새로운 자산 곡선을 생성합니다.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            points: Vec::new(),
            peak_equity: initial_capital,
            max_drawdown_pct: Decimal::ZERO,
            max_drawdown_timestamp: None,
        }
    }

    /// 초기 자본을 반환합니다.
    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    /// 모든 데이터 포인트를 반환합니다.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// 자산 가치 열을 반환합니다.
    pub fn values(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.equity).collect()
    }

    /// 마지막으로 기록된 자산 가치를 반환합니다.
    ///
    /// 마지막 봉에서 체결이 있었다면 백테스트의 최종 자산과 다를 수 있습니다.
    pub fn last_equity(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }

    /// 최대 Drawdown을 반환합니다 (%).
    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown_pct
    }

    /// 최대 Drawdown 발생 시점을 반환합니다.
    pub fn max_drawdown_timestamp(&self) -> Option<DateTime<Utc>> {
        self.max_drawdown_timestamp
    }

    /// 데이터 포인트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 데이터가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 새로운 자산 가치를 추가합니다.
    pub fn add_point(&mut self, timestamp: DateTime<Utc>, equity: Decimal) {
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        let drawdown_pct = if self.peak_equity > Decimal::ZERO {
            (self.peak_equity - equity) / self.peak_equity * dec!(100)
        } else {
            Decimal::ZERO
        };

        if drawdown_pct > self.max_drawdown_pct {
            self.max_drawdown_pct = drawdown_pct;
            self.max_drawdown_timestamp = Some(timestamp);
        }

        let return_pct = if self.initial_capital > Decimal::ZERO {
            (equity - self.initial_capital)
                .checked_div(self.initial_capital)
                .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(dec!(100)))
        } else {
            Decimal::ZERO
        };

        self.points.push(EquityPoint {
            timestamp,
            equity,
            drawdown_pct,
            return_pct,
        });
    }
}
