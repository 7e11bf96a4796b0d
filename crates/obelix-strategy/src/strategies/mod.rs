//! 내장 신호 전략.
//!
//! - **SMA Crossover**: 단기/장기 이동평균 비교. 같은 방향 신호는 반복하지 않음.
//! - **k-NN Classifier**: 이동평균 차이와 모멘텀을 feature로 하는 k-NN 분류.
//!
//! 설정 파일에서는 `type` 필드로 전략을 고릅니다:
//!
//! ```toml
//! [strategy]
//! type = "classifier"
//! short_window = 20
//! long_window = 50
//! neighbor_count = 5
//! class_mode = 3
//! ```

pub mod classifier;
pub mod common;
pub mod crossover;

use obelix_core::ObelixResult;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::traits::{Strategy, StrategyMetadata};

pub use classifier::{ClassifierConfig, ClassifierStrategy};
pub use common::{suppress_repeated_sells, LastAction, RunStats};
pub use crossover::{CrossoverConfig, CrossoverStrategy};

/// 전략 종류별 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    Crossover(CrossoverConfig),
    Classifier(ClassifierConfig),
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Crossover(CrossoverConfig::default())
    }
}

impl StrategyConfig {
    /// 설정의 `type` 값.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyConfig::Crossover(_) => "crossover",
            StrategyConfig::Classifier(_) => "classifier",
        }
    }

    /// 설정을 검증하고 전략 인스턴스를 생성합니다.
    pub fn build(&self) -> ObelixResult<Box<dyn Strategy>> {
        let strategy: Box<dyn Strategy> = match self {
            StrategyConfig::Crossover(config) => Box::new(CrossoverStrategy::new(config.clone())?),
            StrategyConfig::Classifier(config) => {
                Box::new(ClassifierStrategy::new(config.clone())?)
            }
        };
        Ok(strategy)
    }
}

/// 사용 가능한 전략 목록.
pub fn available_strategies() -> Vec<StrategyMetadata> {
    vec![
        StrategyMetadata {
            kind: "crossover".to_string(),
            name: "SMA Crossover".to_string(),
            description: "단기 SMA가 장기 SMA 위에 있으면 매수, 같거나 아래면 매도".to_string(),
            default_config: json!(CrossoverConfig::default()),
        },
        StrategyMetadata {
            kind: "classifier".to_string(),
            name: "k-NN Classifier".to_string(),
            description: "SMA 차이/모멘텀 feature와 미래 수익률 라벨로 학습한 k-NN (표본 내)"
                .to_string(),
            default_config: json!(ClassifierConfig::default()),
        },
    ]
}
