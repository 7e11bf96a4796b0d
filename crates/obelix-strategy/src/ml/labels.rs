//! 미래 수익률 기반 학습 라벨.
//!
//! `future_return = close[i + shift] - close[i]`를 임계값 `T`와 비교합니다.
//!
//! | 모드 | Buy | Sell | Hold |
//! |------|-----|------|------|
//! | 2-class | `> T` | 나머지 | - |
//! | 3-class | `> T` | `< -T` | 나머지 |
//!
//! 마지막 `shift`개 봉은 미래 가격이 없어 라벨이 생성되지 않습니다.

use obelix_core::Signal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 분류 모드. 설정 파일에서는 정수 `2` 또는 `3`으로 표기합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ClassMode {
    /// Buy / Sell
    #[default]
    Binary,
    /// Buy / Sell / Hold
    Ternary,
}

impl ClassMode {
    /// 클래스 개수.
    pub fn class_count(&self) -> u8 {
        match self {
            ClassMode::Binary => 2,
            ClassMode::Ternary => 3,
        }
    }
}

impl TryFrom<u8> for ClassMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ClassMode::Binary),
            3 => Ok(ClassMode::Ternary),
            other => Err(format!("class_mode must be 2 or 3, got {other}")),
        }
    }
}

impl From<ClassMode> for u8 {
    fn from(mode: ClassMode) -> Self {
        mode.class_count()
    }
}

/// 분류기 클래스.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Sell,
    Buy,
    Hold,
}

impl Label {
    /// 미래 수익률을 라벨로 변환합니다.
    pub fn classify(future_return: Decimal, threshold: Decimal, mode: ClassMode) -> Self {
        if future_return > threshold {
            return Label::Buy;
        }
        match mode {
            ClassMode::Binary => Label::Sell,
            ClassMode::Ternary if future_return < -threshold => Label::Sell,
            ClassMode::Ternary => Label::Hold,
        }
    }
}

impl From<Label> for Signal {
    fn from(label: Label) -> Self {
        match label {
            Label::Buy => Signal::Buy,
            Label::Sell => Signal::Sell,
            Label::Hold => Signal::Hold,
        }
    }
}

/// 종가 열에 대한 라벨을 생성합니다.
///
/// 결과 길이는 `closes.len() - shift` (음수면 0)입니다.
pub fn label_future_returns(
    closes: &[Decimal],
    shift: usize,
    threshold: Decimal,
    mode: ClassMode,
) -> Vec<Label> {
    let labeled = closes.len().saturating_sub(shift);
    (0..labeled)
        .map(|i| Label::classify(closes[i + shift] - closes[i], threshold, mode))
        .collect()
}
