//! # Obelix Core
//!
//! 신호 생성 엔진과 백테스터가 공유하는 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 봉(`PriceBar`)과 검증된 가격 시계열(`PriceSeries`)
//! - 매매 신호(`Signal`)와 신호가 부착된 시계열(`SignalSeries`)
//! - 에러 분류 (입력 / 설정 / 이력 부족)
//! - 설정 로딩
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
