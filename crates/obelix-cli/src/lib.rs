//! `obelix` CLI 라이브러리.
//!
//! 바이너리와 통합 테스트가 공유하는 명령 구현과 설정 로더를 제공합니다.

pub mod commands;
pub mod config;
