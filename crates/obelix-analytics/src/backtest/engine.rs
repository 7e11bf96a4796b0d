//! 백테스팅 엔진
//!
//! 신호가 부착된 시계열을 받아 단일 자산 롱 전용, 전액 진입/전액 청산 방식으로
//! 현금과 보유 수량을 시뮬레이션합니다.
//!
//! # 체결 규칙
//!
//! 봉마다 다음 순서로 처리합니다:
//!
//! 1. `현금 + 보유 수량 × 종가`로 자산을 평가해 자산 곡선에 기록 (체결 **이전**)
//! 2. `Buy` 신호, 직전 체결이 `Buy`가 아니고 현금이 남아 있으면 전액 매수
//! 3. `Sell` 신호, 직전 체결이 `Sell`이 아니고 보유 수량이 있으면 전량 매도
//! 4. 그 외에는 아무것도 하지 않음
//!
//! 수수료는 체결 금액에 비례해 차감됩니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use obelix_analytics::backtest::{BacktestConfig, Backtester};
//! use rust_decimal_macros::dec;
//!
//! let config = BacktestConfig::new(dec!(10_000)).with_fee_rate(dec!(0.001));
//! let backtester = Backtester::new(config)?;
//!
//! let report = backtester.run(&signal_series);
//! println!("최종 자산: {}", report.final_equity);
//! println!("{}", report.summary());
//! ```

use chrono::{DateTime, Utc};
use obelix_core::{DecimalExt, ObelixError, Percentage, PriceSeries, Signal, SignalSeries};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::portfolio::EquityCurve;

/// 백테스트 오류
#[derive(Debug, Error)]
pub enum BacktestError {
    /// 설정 오류
    #[error("백테스트 설정 오류: {0}")]
    ConfigError(String),
}

/// 백테스트 결과 타입
pub type BacktestResult<T> = Result<T, BacktestError>;

impl From<BacktestError> for ObelixError {
    fn from(err: BacktestError) -> Self {
        match err {
            BacktestError::ConfigError(msg) => ObelixError::Config(msg),
        }
    }
}

/// 백테스트 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// 초기 자본금
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// 거래 수수료율 (예: 0.001 = 0.1%)
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Percentage,
}

fn default_initial_balance() -> Decimal {
    dec!(10000)
}
fn default_fee_rate() -> Percentage {
    dec!(0.001)
} // 0.1%

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            fee_rate: default_fee_rate(),
        }
    }
}

impl BacktestConfig {
    /// 새로운 백테스트 설정을 생성합니다.
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            ..Default::default()
        }
    }

    /// 수수료율 설정
    pub fn with_fee_rate(mut self, rate: Percentage) -> Self {
        self.fee_rate = rate;
        self
    }

    /// 설정 검증
    pub fn validate(&self) -> BacktestResult<()> {
        if self.initial_balance <= Decimal::ZERO {
            return Err(BacktestError::ConfigError(
                "초기 자본은 0보다 커야 합니다".to_string(),
            ));
        }
        if self.fee_rate < Decimal::ZERO {
            return Err(BacktestError::ConfigError(
                "수수료율은 0 이상이어야 합니다".to_string(),
            ));
        }
        // 수수료율 1 이상이면 매수 후 보유 수량이 0 이하가 됩니다.
        if self.fee_rate >= Decimal::ONE {
            return Err(BacktestError::ConfigError(
                "수수료율은 1보다 작아야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 체결 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// 체결된 거래 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedTrade {
    /// 체결 시각 (봉 타임스탬프)
    pub timestamp: DateTime<Utc>,
    /// 방향
    pub side: TradeSide,
    /// 체결 가격 (봉 종가)
    pub price: Decimal,
    /// 체결 수량
    pub quantity: Decimal,
    /// 차감된 수수료 (현금 단위)
    pub fee: Decimal,
    /// 체결 직후 평가 자산
    pub equity_after: Decimal,
}

/// 시뮬레이션 포지션 상태.
///
/// 봉을 하나씩 접어가며(fold) 갱신됩니다.
#[derive(Debug, Clone)]
struct PositionState {
    cash: Decimal,
    asset_held: Decimal,
    last_executed: Signal,
}

impl PositionState {
    fn new(initial_balance: Decimal) -> Self {
        Self {
            cash: initial_balance,
            asset_held: Decimal::ZERO,
            last_executed: Signal::Undefined,
        }
    }

    /// 평가 자산. Decimal 범위를 넘으면 최댓값으로 포화됩니다.
    fn equity_at(&self, price: Decimal) -> Decimal {
        self.asset_held.saturating_mul(price).saturating_add(self.cash)
    }

    /// 신호를 적용합니다. 체결이 일어나면 거래 기록을 반환합니다.
    fn apply(
        &mut self,
        signal: Signal,
        price: Decimal,
        fee_rate: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Option<ExecutedTrade> {
        match signal {
            Signal::Buy if self.last_executed != Signal::Buy && self.cash > Decimal::ZERO => {
                let fee = self.cash * fee_rate;
                // 수량이 Decimal 범위를 넘으면 체결하지 않고 상태를 유지
                let Some(quantity) = (self.cash - fee).checked_div(price) else {
                    warn!(%price, cash = %self.cash, "Buy blocked: quantity overflows");
                    return None;
                };
                self.asset_held = quantity;
                self.cash = Decimal::ZERO;
                self.last_executed = Signal::Buy;
                Some(ExecutedTrade {
                    timestamp,
                    side: TradeSide::Buy,
                    price,
                    quantity,
                    fee,
                    equity_after: self.equity_at(price),
                })
            }
            Signal::Sell
                if self.last_executed != Signal::Sell && self.asset_held > Decimal::ZERO =>
            {
                let quantity = self.asset_held;
                let Some(gross) = quantity.checked_mul(price) else {
                    warn!(%price, %quantity, "Sell blocked: proceeds overflow");
                    return None;
                };
                let fee = gross * fee_rate;
                self.cash = gross - fee;
                self.asset_held = Decimal::ZERO;
                self.last_executed = Signal::Sell;
                Some(ExecutedTrade {
                    timestamp,
                    side: TradeSide::Sell,
                    price,
                    quantity,
                    fee,
                    equity_after: self.cash,
                })
            }
            _ => None,
        }
    }
}

/// 백테스트 실행 리포트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// 설정 정보
    pub config: BacktestConfig,

    /// 최종 자산 (`현금 + 보유 수량 × 마지막 종가`)
    ///
    /// 마지막 봉의 신호가 체결되었다면 자산 곡선의 마지막 값과 다를 수 있으며,
    /// 이 값이 기준입니다.
    pub final_equity: Decimal,

    /// 자산 곡선 (처리한 봉마다 한 점, 체결 이전 평가)
    pub equity_curve: EquityCurve,

    /// 체결된 거래
    pub trades: Vec<ExecutedTrade>,

    /// 총 수수료
    pub total_fees: Decimal,

    /// 같은 기간 매수 후 보유 전략의 최종 자산
    pub buy_and_hold_equity: Decimal,

    /// 백테스트 기간 시작
    pub start_time: Option<DateTime<Utc>>,

    /// 백테스트 기간 종료
    pub end_time: Option<DateTime<Utc>>,

    /// 데이터 포인트 수
    pub data_points: usize,
}

impl BacktestReport {
    /// 체결 횟수
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// 총 수익률 (%)
    pub fn total_return_pct(&self) -> Decimal {
        percent_change(self.config.initial_balance, self.final_equity)
    }

    /// 매수 후 보유 수익률 (%)
    pub fn buy_and_hold_return_pct(&self) -> Decimal {
        percent_change(self.config.initial_balance, self.buy_and_hold_equity)
    }

    /// 매수 후 보유 대비 초과 자산
    pub fn excess_return(&self) -> Decimal {
        self.final_equity - self.buy_and_hold_equity
    }

    /// 최대 낙폭 (%)
    pub fn max_drawdown_pct(&self) -> Decimal {
        self.equity_curve.max_drawdown()
    }

    /// 요약 문자열 반환
    pub fn summary(&self) -> String {
        let period = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!(
                "{} → {} ({} 일)",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d"),
                (end - start).num_days()
            ),
            _ => "-".to_string(),
        };

        format!(
            "백테스트 결과 요약\n\
             ═══════════════════════════════════════\n\
             기간: {}\n\
             데이터 포인트: {}\n\
             ───────────────────────────────────────\n\
             초기 자본: {}\n\
             수수료율: {}\n\
             최종 자산: {:.2}\n\
             총 수익률: {:.2}%\n\
             최대 낙폭: {:.2}%\n\
             ───────────────────────────────────────\n\
             매수 후 보유: {:.2} ({:.2}%)\n\
             초과 수익: {:.2}\n\
             ───────────────────────────────────────\n\
             총 거래: {}\n\
             총 수수료: {:.2}\n\
             ═══════════════════════════════════════",
            period,
            self.data_points,
            self.config.initial_balance,
            self.config.fee_rate.to_percentage_string(),
            self.final_equity,
            self.total_return_pct(),
            self.max_drawdown_pct(),
            self.buy_and_hold_equity,
            self.buy_and_hold_return_pct(),
            self.excess_return(),
            self.trade_count(),
            self.total_fees,
        )
    }
}

fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        Decimal::ZERO
    } else {
        (to - from)
            .checked_div(from)
            .map_or(Decimal::MAX, |ratio| ratio.saturating_mul(dec!(100)))
    }
}

/// 백테스팅 엔진
///
/// 실행마다 상태를 새로 만들기 때문에 같은 인스턴스로 여러 번 실행해도
/// 결과가 서로 영향을 주지 않습니다.
#[derive(Debug, Clone)]
pub struct Backtester {
    config: BacktestConfig,
}

impl Backtester {
    /// 설정을 검증하고 백테스터를 생성합니다.
    pub fn new(config: BacktestConfig) -> BacktestResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 설정을 반환합니다.
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// 신호 시계열로 백테스트를 실행합니다.
    ///
    /// 입력 검증은 시계열 생성 시점에 끝났으므로 실패하지 않습니다.
    /// 빈 시계열이면 최종 자산은 초기 자본, 자산 곡선은 비어 있습니다.
    pub fn run(&self, signals: &SignalSeries) -> BacktestReport {
        let fee_rate = self.config.fee_rate;
        let mut state = PositionState::new(self.config.initial_balance);
        let mut equity_curve = EquityCurve::new(self.config.initial_balance);
        let mut trades = Vec::new();

        for point in signals.iter() {
            let price = point.close();
            let timestamp = point.timestamp();

            equity_curve.add_point(timestamp, state.equity_at(price));

            if let Some(trade) = state.apply(point.signal, price, fee_rate, timestamp) {
                debug!(
                    side = %trade.side,
                    price = %trade.price,
                    quantity = %trade.quantity,
                    fee = %trade.fee,
                    timestamp = %trade.timestamp,
                    "Trade executed"
                );
                trades.push(trade);
            }
        }

        let final_equity = match signals.last_close() {
            Some(last_close) => state.equity_at(last_close),
            None => self.config.initial_balance,
        };
        let total_fees = trades
            .iter()
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.fee));
        let buy_and_hold_equity = self.buy_and_hold_return(&signals.to_price_series());

        info!(
            final_equity = %final_equity,
            trades = trades.len(),
            bars = signals.len(),
            "Backtest completed"
        );

        BacktestReport {
            config: self.config.clone(),
            final_equity,
            equity_curve,
            trades,
            total_fees,
            buy_and_hold_equity,
            start_time: signals.points().first().map(|p| p.timestamp()),
            end_time: signals.points().last().map(|p| p.timestamp()),
            data_points: signals.len(),
        }
    }

    /// 첫 종가에 전액 매수하고 마지막 종가에 전량 매도한 최종 자산.
    ///
    /// 매수/매도 모두 수수료가 적용됩니다. 빈 시계열이면 초기 자본을 반환합니다.
    pub fn buy_and_hold_return(&self, series: &PriceSeries) -> Decimal {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return self.config.initial_balance;
        };

        let keep = Decimal::ONE - self.config.fee_rate;
        // 매수 수량이 범위를 넘으면 run과 같이 매수하지 않은 것으로 봅니다
        match (self.config.initial_balance * keep).checked_div(first.close) {
            Some(quantity) => quantity.saturating_mul(last.close).saturating_mul(keep),
            None => self.config.initial_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use obelix_core::{PriceBar, SignalPoint};

    fn signal_series(rows: &[(Decimal, Signal)]) -> SignalSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = rows
            .iter()
            .enumerate()
            .map(|(i, (close, signal))| {
                SignalPoint::new(
                    PriceBar::from_close(start + Duration::days(i as i64), *close),
                    *signal,
                )
            })
            .collect();
        SignalSeries::new(points).unwrap()
    }

    fn backtester(fee: Decimal) -> Backtester {
        Backtester::new(BacktestConfig::new(dec!(10000)).with_fee_rate(fee)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(BacktestConfig::default().validate().is_ok());
        assert!(BacktestConfig::new(dec!(0)).validate().is_err());
        assert!(BacktestConfig::new(dec!(-5)).validate().is_err());
        assert!(BacktestConfig::default()
            .with_fee_rate(dec!(-0.01))
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_fee_rate(dec!(1))
            .validate()
            .is_err());

        let err: ObelixError = Backtester::new(BacktestConfig::new(dec!(0)))
            .unwrap_err()
            .into();
        assert!(err.is_rejected_configuration());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: BacktestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BacktestConfig::default());
        assert_eq!(config.initial_balance, dec!(10000));
        assert_eq!(config.fee_rate, dec!(0.001));
    }

    #[test]
    fn test_round_trip_with_fees() {
        let series = signal_series(&[
            (dec!(100), Signal::Buy),
            (dec!(110), Signal::Hold),
            (dec!(120), Signal::Sell),
        ]);
        let report = backtester(dec!(0.01)).run(&series);

        // 10000 × 0.99 / 100 = 99 단위, 99 × 120 × 0.99 = 11761.2
        assert_eq!(report.trade_count(), 2);
        assert_eq!(report.trades[0].quantity, dec!(99));
        assert_eq!(report.trades[0].fee, dec!(100));
        assert_eq!(report.trades[1].fee, dec!(118.8));
        assert_eq!(report.final_equity, dec!(11761.2));
        assert_eq!(report.total_fees, dec!(218.8));

        // 자산 곡선은 체결 이전 평가
        assert_eq!(
            report.equity_curve.values(),
            vec![dec!(10000), dec!(10890), dec!(11880)]
        );
    }

    #[test]
    fn test_repeated_signals_are_noops() {
        let series = signal_series(&[
            (dec!(100), Signal::Sell),
            (dec!(100), Signal::Buy),
            (dec!(50), Signal::Buy),
            (dec!(200), Signal::Sell),
            (dec!(100), Signal::Sell),
        ]);
        let report = backtester(dec!(0)).run(&series);

        // 첫 Sell은 보유 수량이 없어 무시, 두 번째 Buy와 마지막 Sell도 무시
        assert_eq!(report.trade_count(), 2);
        assert_eq!(report.final_equity, dec!(20000));
    }

    #[test]
    fn test_final_equity_marks_open_position_at_last_close() {
        let series = signal_series(&[
            (dec!(100), Signal::Undefined),
            (dec!(100), Signal::Buy),
            (dec!(150), Signal::Hold),
        ]);
        let report = backtester(dec!(0)).run(&series);

        assert_eq!(report.final_equity, dec!(15000));
        assert_eq!(report.equity_curve.last_equity(), dec!(15000));
    }

    #[test]
    fn test_final_equity_differs_from_curve_when_last_bar_trades() {
        let series = signal_series(&[(dec!(100), Signal::Buy), (dec!(100), Signal::Sell)]);
        let report = backtester(dec!(0.01)).run(&series);

        // 마지막 봉의 매도 수수료는 곡선에 반영되지 않음
        assert_eq!(report.equity_curve.last_equity(), dec!(9900));
        assert_eq!(report.final_equity, dec!(9801));
    }

    #[test]
    fn test_empty_series() {
        let report = backtester(dec!(0.001)).run(&SignalSeries::default());
        assert_eq!(report.final_equity, dec!(10000));
        assert!(report.equity_curve.is_empty());
        assert_eq!(report.buy_and_hold_equity, dec!(10000));
        assert_eq!(report.start_time, None);
        assert!(report.summary().contains("기간: -"));
    }

    #[test]
    fn test_buy_and_hold_return() {
        let bt = backtester(dec!(0.01));
        let series = signal_series(&[(dec!(100), Signal::Hold), (dec!(120), Signal::Hold)]);
        assert_eq!(bt.buy_and_hold_return(&series.to_price_series()), dec!(11761.2));
        assert_eq!(bt.buy_and_hold_return(&PriceSeries::empty()), dec!(10000));
    }

    #[test]
    fn test_report_metrics() {
        let series = signal_series(&[
            (dec!(100), Signal::Buy),
            (dec!(80), Signal::Hold),
            (dec!(110), Signal::Sell),
        ]);
        let report = backtester(dec!(0)).run(&series);

        assert_eq!(report.total_return_pct(), dec!(10));
        assert_eq!(report.max_drawdown_pct(), dec!(20));
        assert_eq!(report.excess_return(), dec!(0));

        let summary = report.summary();
        assert!(summary.contains("총 거래: 2"));
        assert!(summary.contains("최종 자산: 11000.00"));
        assert!(summary.contains("수수료율: 0.00%"));
    }

    fn big_balance() -> Decimal {
        Decimal::from_i128_with_scale(10i128.pow(20), 0)
    }

    #[test]
    fn test_overflowing_buy_is_blocked() {
        let bt = Backtester::new(BacktestConfig::new(big_balance()).with_fee_rate(dec!(0))).unwrap();
        let series = signal_series(&[(Decimal::new(1, 10), Signal::Buy), (dec!(1), Signal::Hold)]);

        let report = bt.run(&series);

        assert!(report.trades.is_empty());
        assert_eq!(report.final_equity, big_balance());
        assert_eq!(report.equity_curve.values(), vec![big_balance(), big_balance()]);
        assert_eq!(bt.buy_and_hold_return(&series.to_price_series()), big_balance());
    }

    #[test]
    fn test_overflowing_mark_saturates() {
        let bt = Backtester::new(BacktestConfig::new(big_balance()).with_fee_rate(dec!(0))).unwrap();
        let series = signal_series(&[
            (dec!(1), Signal::Buy),
            (Decimal::from(1_000_000_000_000i64), Signal::Hold),
            (Decimal::from(1_000_000_000_000i64), Signal::Sell),
        ]);

        let report = bt.run(&series);

        // 매수만 체결되고 매도는 금액이 범위를 넘어 막힘
        assert_eq!(report.trade_count(), 1);
        assert_eq!(report.final_equity, Decimal::MAX);
        assert_eq!(report.equity_curve.last_equity(), Decimal::MAX);
    }
}
