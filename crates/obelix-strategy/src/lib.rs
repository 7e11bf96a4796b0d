//! 신호 생성 전략.
//!
//! 이 크레이트가 제공하는 기능:
//! - 신호 전략을 위한 Strategy trait
//! - 내장 전략 (SMA 크로스오버, k-NN 분류기)
//! - 분류기 구성요소 (feature 추출, 라벨 생성, k-NN)
//! - 설정에서 전략을 만드는 `StrategyConfig`
//!
//! # 예제
//!
//! ```rust,ignore
//! use obelix_strategy::{CrossoverConfig, StrategyConfig};
//!
//! let config = StrategyConfig::Crossover(CrossoverConfig::new(20, 50));
//! let mut strategy = config.build()?;
//!
//! let signals = strategy.generate_signals(&price_series)?;
//! for point in signals.iter() {
//!     println!("{} {} {}", point.timestamp(), point.close(), point.signal);
//! }
//! ```

pub mod ml;
pub mod strategies;
pub mod traits;

// 주요 타입 재내보내기
pub use ml::{ClassMode, KnnClassifier, Label, MlError, MlResult};
pub use strategies::{
    available_strategies, ClassifierConfig, ClassifierStrategy, CrossoverConfig,
    CrossoverStrategy, StrategyConfig,
};
pub use traits::{Strategy, StrategyMetadata};
