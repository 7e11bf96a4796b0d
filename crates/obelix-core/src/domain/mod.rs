//! 신호 생성과 백테스트를 위한 도메인 모델.

mod market_data;
mod signal;

pub use market_data::*;
pub use signal::*;
