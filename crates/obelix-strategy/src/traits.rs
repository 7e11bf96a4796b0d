//! Strategy trait 정의.

use obelix_core::{ObelixResult, PriceSeries, SignalSeries};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 신호 생성 전략을 위한 Strategy trait.
///
/// 가격 시계열 전체를 받아 봉마다 신호가 부착된 시계열을 돌려줍니다.
/// 분류기 전략은 호출마다 모델을 다시 학습하므로 `&mut self`를 받습니다.
/// 하나의 인스턴스를 여러 실행이 동시에 공유하는 것은 지원하지 않습니다.
pub trait Strategy: Send {
    /// 전략 이름 반환.
    fn name(&self) -> &str;

    /// 전략 설명 반환.
    fn description(&self) -> &str;

    /// 가격 시계열에서 신호 시계열을 생성합니다.
    ///
    /// 지표가 누락된 워밍업 봉은 결과에서 제외됩니다.
    fn generate_signals(&mut self, series: &PriceSeries) -> ObelixResult<SignalSeries>;

    /// 현재 전략 상태를 JSON으로 반환 (디버깅/모니터링용).
    fn get_state(&self) -> Value;
}

/// 전략 목록 표시를 위한 메타데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyMetadata {
    /// 설정의 `type` 값
    pub kind: String,
    /// 전략 이름
    pub name: String,
    /// 전략 설명
    pub description: String,
    /// 기본 설정
    pub default_config: Value,
}
