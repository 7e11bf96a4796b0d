//! 포트폴리오 분석 모듈.

pub mod equity_curve;

pub use equity_curve::{EquityCurve, EquityPoint};
