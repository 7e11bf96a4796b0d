//! 신호 엔진과 백테스터의 에러 타입.
//!
//! 모든 에러는 상태 변경 전에 검출됩니다. 에러가 반환되면 전략이나
//! 백테스터에는 부분적으로 갱신된 상태가 남지 않습니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum ObelixError {
    /// 잘못된 입력 (빈 시계열, 윈도우가 시계열보다 긴 경우, 정렬되지 않은 봉 등)
    #[error("입력 에러: {0}")]
    Input(String),

    /// 잘못된 설정 (0 이하의 윈도우, 0 이하의 이웃 수, 음수 수수료 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 워밍업/미래 시프트 행 제거 후 학습할 데이터가 부족함
    #[error("이력 부족 ({stage}): 필요 {required}개, 남은 행 {provided}개")]
    InsufficientHistory {
        /// 데이터가 부족해진 단계 (예: "feature", "label")
        stage: String,
        /// 필요한 최소 행 수
        required: usize,
        /// 실제로 남은 행 수
        provided: usize,
    },

    /// 외부 데이터 파싱 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type ObelixResult<T> = Result<T, ObelixError>;

impl ObelixError {
    /// 호출자의 설정이 거부된 에러인지 확인합니다.
    ///
    /// 입력 에러도 "거부된 설정"으로 취급합니다. 윈도우가 시계열보다 긴 경우처럼
    /// 설정과 입력의 조합이 성립하지 않는 경우이기 때문입니다.
    pub fn is_rejected_configuration(&self) -> bool {
        matches!(self, ObelixError::Config(_) | ObelixError::Input(_))
    }

    /// 구조화된 로그에 사용하는 안정적인 에러 코드를 반환합니다.
    pub fn code(&self) -> &'static str {
        match self {
            ObelixError::Input(_) => "input_error",
            ObelixError::Config(_) => "configuration_error",
            ObelixError::InsufficientHistory { .. } => "insufficient_history",
            ObelixError::Data(_) => "data_error",
            ObelixError::Serialization(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for ObelixError {
    fn from(err: serde_json::Error) -> Self {
        ObelixError::Serialization(err.to_string())
    }
}
