//! ML 모듈 에러 타입.

use obelix_core::ObelixError;
use thiserror::Error;

/// 분류기 학습/예측에서 발생할 수 있는 에러.
#[derive(Debug, Error)]
pub enum MlError {
    /// fit 이전에 predict 호출
    #[error("Model is not fitted")]
    NotFitted,

    /// feature 차원 또는 행 수 불일치
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// 학습을 위한 데이터 부족
    #[error("Insufficient data: need {required} samples, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// 잘못된 파라미터
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// ML 작업을 위한 Result 타입.
pub type MlResult<T> = Result<T, MlError>;

impl From<MlError> for ObelixError {
    fn from(err: MlError) -> Self {
        match err {
            MlError::InsufficientData { required, actual } => ObelixError::InsufficientHistory {
                stage: "fit".to_string(),
                required,
                provided: actual,
            },
            MlError::InvalidParameter(msg) => ObelixError::Config(msg),
            MlError::DimensionMismatch { .. } => ObelixError::Input(err.to_string()),
            MlError::NotFitted => ObelixError::Data(err.to_string()),
        }
    }
}
