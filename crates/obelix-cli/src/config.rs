//! CLI 애플리케이션 설정.
//!
//! 우선순위 (높은 순):
//! 1. 명령줄 인자
//! 2. 환경 변수 (`OBELIX__SECTION__KEY`, `.env` 포함)
//! 3. 설정 파일 (기본 `config/default.toml`)
//! 4. 각 설정 구조체의 serde 기본값

use anyhow::{anyhow, bail, Context, Result};
use obelix_analytics::BacktestConfig;
use obelix_core::{load_layered, LogConfig, LoggingConfig, DEFAULT_ENV_PREFIX};
use obelix_strategy::{ClassMode, ClassifierConfig, CrossoverConfig, StrategyConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 입력 데이터 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DataConfig {
    /// 가격 CSV 경로
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// 표시용 심볼
    #[serde(default)]
    pub symbol: Option<String>,
}

/// 전체 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
}

impl AppConfig {
    /// `.env`를 읽은 뒤 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load(path: &Path) -> Result<Self> {
        if let Ok(env_path) = dotenvy::dotenv() {
            debug!(path = %env_path.display(), "Loaded .env file");
        }
        Self::load_without_dotenv(path, DEFAULT_ENV_PREFIX)
    }

    /// `.env` 없이 파일과 지정한 접두사의 환경 변수만 사용합니다.
    pub fn load_without_dotenv(path: &Path, env_prefix: &str) -> Result<Self> {
        let config: AppConfig = load_layered(path, env_prefix)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 로깅 설정을 결정합니다.
    ///
    /// 설정 파일이 있으면 `[logging]` 섹션을, 없으면 `RUST_LOG` / `LOG_FORMAT`을 따릅니다.
    pub fn log_config(&self, config_path: &Path) -> LogConfig {
        if config_path.is_file() {
            self.logging.to_log_config()
        } else {
            LogConfig::from_env()
        }
    }

    /// 백테스트 설정 검증. 전략 설정은 전략 생성 시 검증됩니다.
    pub fn validate(&self) -> Result<()> {
        self.backtest
            .validate()
            .context("Invalid [backtest] configuration")?;
        Ok(())
    }
}

/// 명령줄에서 전략 설정을 덮어쓰는 인자.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StrategyArgs {
    /// 전략 종류 (crossover, classifier). 파일과 다르면 해당 전략의 기본값에서 시작
    #[arg(long = "strategy")]
    pub kind: Option<String>,

    /// 단기 이동평균 기간
    #[arg(long)]
    pub short_window: Option<usize>,

    /// 장기 이동평균 기간
    #[arg(long)]
    pub long_window: Option<usize>,

    /// 이웃 수 (classifier)
    #[arg(long)]
    pub neighbors: Option<usize>,

    /// 라벨 계산용 미래 봉 거리 (classifier)
    #[arg(long)]
    pub future_shift: Option<usize>,

    /// 수익률 임계값 (classifier)
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// 분류 모드 2 또는 3 (classifier)
    #[arg(long)]
    pub class_mode: Option<u8>,
}

impl StrategyArgs {
    /// 인자를 설정 위에 덮어씁니다.
    pub fn apply(&self, base: StrategyConfig) -> Result<StrategyConfig> {
        let mut config = match self.kind.as_deref() {
            None => base,
            Some(kind) if kind == base.kind() => base,
            Some("crossover") => StrategyConfig::Crossover(CrossoverConfig::default()),
            Some("classifier") => StrategyConfig::Classifier(ClassifierConfig::default()),
            Some(other) => {
                bail!("Unknown strategy type: {other}. Run `obelix strategies` to list them.")
            }
        };

        match &mut config {
            StrategyConfig::Crossover(c) => {
                if let Some(v) = self.short_window {
                    c.short_window = v;
                }
                if let Some(v) = self.long_window {
                    c.long_window = v;
                }
                if self.neighbors.is_some()
                    || self.future_shift.is_some()
                    || self.threshold.is_some()
                    || self.class_mode.is_some()
                {
                    warn!("Classifier options are ignored by the crossover strategy");
                }
            }
            StrategyConfig::Classifier(c) => {
                if let Some(v) = self.short_window {
                    c.short_window = v;
                }
                if let Some(v) = self.long_window {
                    c.long_window = v;
                }
                if let Some(v) = self.neighbors {
                    c.neighbor_count = v;
                }
                if let Some(v) = self.future_shift {
                    c.future_shift = v;
                }
                if let Some(v) = self.threshold {
                    c.return_threshold = v;
                }
                if let Some(v) = self.class_mode {
                    c.class_mode = ClassMode::try_from(v).map_err(|e| anyhow!(e))?;
                }
            }
        }

        Ok(config)
    }
}
