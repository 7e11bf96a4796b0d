//! 신호 시퀀스 속성 테스트.

use chrono::{Duration, TimeZone, Utc};
use obelix_core::{PriceBar, PriceSeries, Signal};
use obelix_strategy::strategies::suppress_repeated_sells;
use obelix_strategy::Strategy as _;
use obelix_strategy::{
    ClassMode, ClassifierConfig, ClassifierStrategy, CrossoverConfig, CrossoverStrategy,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn price_series(closes: &[Decimal]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, c)| PriceBar::from_close(start + Duration::minutes(i as i64), *c))
        .collect();
    PriceSeries::new(bars).unwrap()
}

fn closes_strategy(min_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(100u32..20_000, min_len..120)
        .prop_map(|cents| cents.into_iter().map(|c| Decimal::new(c as i64, 2)).collect())
}

fn any_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        Just(Signal::Buy),
        Just(Signal::Sell),
        Just(Signal::Hold),
        Just(Signal::Undefined),
    ]
}

/// 연속된 방향성 신호 (Hold/Undefined 무시) 중 같은 신호가 이어지는지 확인.
fn has_repeated_actionable(signals: &[Signal], target: Option<Signal>) -> bool {
    let actionable: Vec<Signal> = signals.iter().copied().filter(Signal::is_actionable).collect();
    actionable
        .windows(2)
        .any(|w| w[0] == w[1] && target.map_or(true, |t| w[0] == t))
}

proptest! {
    #[test]
    fn prop_crossover_never_repeats_actionable_signal(
        closes in closes_strategy(1),
        short in 1usize..10,
        long in 1usize..30,
    ) {
        prop_assume!(short.max(long) <= closes.len());
        let mut strategy = CrossoverStrategy::new(CrossoverConfig::new(short, long)).unwrap();
        let output = strategy.generate_signals(&price_series(&closes)).unwrap();

        prop_assert_eq!(output.len(), closes.len() - (short.max(long) - 1));
        prop_assert!(output.signals().iter().all(|s| *s != Signal::Hold));
        prop_assert!(!has_repeated_actionable(&output.signals(), None));
        // 첫 행은 항상 방향성 신호
        prop_assert!(output.points()[0].signal.is_actionable());
    }

    #[test]
    fn prop_sell_filter_removes_repeated_sells(
        signals in prop::collection::vec(any_signal(), 0..100),
    ) {
        let filtered = suppress_repeated_sells(&signals);
        prop_assert_eq!(filtered.len(), signals.len());
        prop_assert!(!has_repeated_actionable(&filtered, Some(Signal::Sell)));

        for (before, after) in signals.iter().zip(&filtered) {
            match before {
                Signal::Sell => prop_assert!(matches!(after, Signal::Sell | Signal::Hold)),
                other => prop_assert_eq!(other, after),
            }
        }
    }

    #[test]
    fn prop_ternary_classifier_has_no_repeated_sells(
        closes in closes_strategy(12),
        k in 1usize..8,
        threshold_cents in 0u32..200,
    ) {
        let config = ClassifierConfig::new(3, 6)
            .with_neighbor_count(k)
            .with_class_mode(ClassMode::Ternary)
            .with_return_threshold(Decimal::new(threshold_cents as i64, 2));
        let mut strategy = ClassifierStrategy::new(config).unwrap();
        let output = strategy.generate_signals(&price_series(&closes)).unwrap();

        prop_assert_eq!(output.len(), closes.len() - 5 - 1);
        prop_assert!(!has_repeated_actionable(&output.signals(), Some(Signal::Sell)));
    }
}
