//! 설정 관리.
//!
//! 애플리케이션 설정은 TOML 파일을 기본으로 읽고, 환경 변수로 덮어씁니다.
//! 각 컴포넌트 설정(백테스트, 전략)은 해당 크레이트에 정의되며, 여기서는
//! 공통 로깅 설정과 계층형 로더만 제공합니다.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ObelixError;
use crate::logging::{LogConfig, LogFormat};

/// 환경 변수 접두사 기본값 (`OBELIX__BACKTEST__FEE_RATE` 형식).
pub const DEFAULT_ENV_PREFIX: &str = "OBELIX";

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 [`LogConfig`]로 변환합니다.
    ///
    /// 알 수 없는 형식 문자열은 pretty로 대체됩니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

/// 파일과 환경 변수에서 설정을 로드합니다.
///
/// 파일이 없으면 환경 변수와 serde 기본값만으로 구성합니다.
/// 환경 변수는 `{prefix}__SECTION__KEY` 형식을 사용합니다.
pub fn load_layered<T, P>(path: P, env_prefix: &str) -> Result<T, ObelixError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let builder = config::Config::builder()
        // 파일에서 로드 (선택)
        .add_source(config::File::from(path.as_ref()).required(false))
        // 환경 변수로 오버라이드
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder
        .build()
        .map_err(|e| ObelixError::Config(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ObelixError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default)]
        logging: LoggingConfig,
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.to_log_config().format, LogFormat::Pretty);
    }

    #[test]
    fn test_logging_config_unknown_format_falls_back() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "yaml".to_string(),
        };
        let log = config.to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_layered_missing_file_uses_defaults() {
        let sample: Sample =
            load_layered("does/not/exist.toml", "OBELIX_TEST_MISSING").unwrap();
        assert_eq!(sample.logging.level, "info");
    }
}
