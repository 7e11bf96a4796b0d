//! 신호 엔진 및 백테스터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 설정 파일의 전략으로 백테스트
//! obelix backtest --data data/btc_usdt_1h.csv
//!
//! # 분류기 전략, 3분류 모드로 백테스트하고 JSON 저장
//! obelix backtest --data prices.csv --strategy classifier --class-mode 3 -o out/run.json
//!
//! # 신호만 생성해서 마지막 20행 출력
//! obelix signals --data prices.csv --short-window 10 --long-window 30 --limit 20
//!
//! # 전략 목록
//! obelix strategies
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use obelix_core::{init_logging, LogFormat};
use rust_decimal::Decimal;
use std::path::PathBuf;

use obelix_cli::commands::backtest::{run_backtest, save_output};
use obelix_cli::commands::data::load_price_series;
use obelix_cli::commands::report::{format_signal_table, print_available_strategies};
use obelix_cli::commands::signals;
use obelix_cli::config::{AppConfig, StrategyArgs, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "obelix")]
#[command(about = "SMA crossover / k-NN signal engine and single-asset backtester", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 로그 레벨 (설정 파일 값을 덮어씀)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 신호 생성 후 백테스트 실행
    Backtest {
        /// 가격 CSV 경로 (기본: 설정의 data.path)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// 표시용 심볼
        #[arg(short, long)]
        symbol: Option<String>,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// 초기 자본
        #[arg(long)]
        initial_balance: Option<Decimal>,

        /// 수수료율 (0.001 = 0.1%)
        #[arg(long)]
        fee_rate: Option<Decimal>,

        /// 결과 저장 경로 (.json이면 JSON, 그 외 텍스트 요약)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 요약 대신 JSON을 stdout에 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 신호만 생성해서 표로 출력
    Signals {
        /// 가격 CSV 경로 (기본: 설정의 data.path)
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[command(flatten)]
        strategy: StrategyArgs,

        /// 마지막 N행만 출력
        #[arg(short, long)]
        limit: Option<usize>,

        /// 표 대신 JSON 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 사용 가능한 전략 목록
    Strategies,
}

fn data_path(flag: Option<PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    flag.or_else(|| config.data.path.clone()).ok_or_else(|| {
        anyhow!("No price data given. Pass --data or set [data].path in the config file")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;

    let mut log_config = config.log_config(&cli.config);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    init_logging(log_config).map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    match cli.command {
        Commands::Backtest {
            data,
            symbol,
            strategy,
            initial_balance,
            fee_rate,
            output,
            json,
        } => {
            config.strategy = strategy.apply(config.strategy)?;
            if let Some(v) = initial_balance {
                config.backtest.initial_balance = v;
            }
            if let Some(v) = fee_rate {
                config.backtest.fee_rate = v;
            }
            if symbol.is_some() {
                config.data.symbol = symbol;
            }
            config.validate()?;

            let path = data_path(data, &config)?;
            let symbol = config.data.symbol.clone().unwrap_or_default();
            let span = obelix_core::run_span!("backtest", config.strategy.kind(), symbol);
            let _guard = span.enter();

            let series = load_price_series(&path)?;
            let result = run_backtest(&config, &series)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.summary());
            }

            if let Some(output) = output {
                save_output(&result, &output)?;
            }
        }

        Commands::Signals {
            data,
            strategy,
            limit,
            json,
        } => {
            config.strategy = strategy.apply(config.strategy)?;

            let path = data_path(data, &config)?;
            let span = obelix_core::run_span!("signals", config.strategy.kind());
            let _guard = span.enter();

            let series = load_price_series(&path)?;
            let result = signals::generate(&config.strategy, &series)
                .with_context(|| format!("Signal generation failed for {}", path.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.headline());
                print!("{}", format_signal_table(&result.signals, limit));
            }
        }

        Commands::Strategies => {
            print_available_strategies();
        }
    }

    Ok(())
}
