//! 기술적 지표 모듈.
//!
//! 모든 지표는 가격 열을 받아 같은 길이의 [`IndicatorSeries`]를 돌려주는
//! 순수 함수입니다. 이력이 부족한 앞쪽 구간은 `None`(누락)으로 표시되며,
//! 임의의 숫자로 채우지 않습니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표
//! - **SMA**: 단순 이동평균 (`rolling_mean`)
//!
//! ## 모멘텀 지표
//! - **변화율**: 직전 봉 대비 종가 변화율 (`pct_change`)
//!
//! # 사용 예시
//!
//! ```ignore
//! use obelix_analytics::indicators::{rolling_mean, pct_change};
//!
//! let sma = rolling_mean(&series, 20)?;
//! let momentum = pct_change(&series.closes());
//! ```

pub mod momentum;
pub mod trend;

use obelix_core::ObelixError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use momentum::pct_change;
pub use trend::{rolling_mean, SmaParams, TrendIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류 (Decimal 범위 초과 등)
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl From<IndicatorError> for ObelixError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { .. } => ObelixError::Input(err.to_string()),
            IndicatorError::InvalidParameter(_) => ObelixError::Config(err.to_string()),
            IndicatorError::CalculationError(_) => ObelixError::Input(err.to_string()),
        }
    }
}

/// 가격 시계열과 인덱스 단위로 정렬된 지표 값.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    values: Vec<Option<Decimal>>,
}

impl IndicatorSeries {
    /// 값 목록으로 지표 시계열을 생성합니다.
    pub fn new(values: Vec<Option<Decimal>>) -> Self {
        Self { values }
    }

    /// 길이를 반환합니다.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 인덱스의 값을 반환합니다. 누락이거나 범위를 벗어나면 `None`.
    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    /// 인덱스의 값이 누락인지 확인합니다.
    pub fn is_missing(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    /// 누락 개수를 반환합니다.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// 모든 값을 반환합니다.
    pub fn values(&self) -> &[Option<Decimal>] {
        &self.values
    }

    /// 값 반복자를 반환합니다.
    pub fn iter(&self) -> impl Iterator<Item = Option<Decimal>> + '_ {
        self.values.iter().copied()
    }
}
