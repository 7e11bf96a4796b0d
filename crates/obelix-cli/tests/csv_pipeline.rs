//! CSV 파일에서 백테스트 결과까지의 통합 테스트.

use obelix_cli::commands::backtest::{run_backtest, save_output};
use obelix_cli::commands::data::load_price_series;
use obelix_cli::commands::report::format_signal_table;
use obelix_cli::commands::signals;
use obelix_cli::config::{AppConfig, StrategyArgs};
use rust_decimal_macros::dec;
use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn price_csv(closes: &[&str]) -> String {
    let mut csv = String::from("timestamp,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        let ts = 1_704_067_200_000i64 + i as i64 * 3_600_000;
        csv.push_str(&format!("{ts},{close},{close},{close},{close},1\n"));
    }
    csv
}

#[test]
fn test_backtest_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_file(&dir, "prices.csv", &price_csv(&["100", "101", "105", "103"]));
    let config_path = write_file(
        &dir,
        "app.toml",
        &format!(
            r#"
            [data]
            path = "{}"
            symbol = "TEST/USD"

            [strategy]
            type = "crossover"
            short_window = 1
            long_window = 2

            [backtest]
            initial_balance = "10000"
            fee_rate = "0"
            "#,
            data.display()
        ),
    );

    let config = AppConfig::load_without_dotenv(&config_path, "OBELIX_CSV_PIPELINE_TEST").unwrap();
    let series = load_price_series(config.data.path.as_ref().unwrap()).unwrap();
    let output = run_backtest(&config, &series).unwrap();

    // 101 > 100.5 매수, 105 > 103 유지, 103 < 104 매도
    let signals: Vec<String> = output.signals.iter().map(|p| p.signal.to_string()).collect();
    assert_eq!(signals, vec!["BUY", "-", "SELL"]);
    assert_eq!(output.report.trade_count(), 2);
    assert_eq!(
        output.report.final_equity.round_dp(6),
        (dec!(10000) / dec!(101) * dec!(103)).round_dp(6)
    );
    assert_eq!(output.symbol.as_deref(), Some("TEST/USD"));

    let json_path = dir.path().join("run.json");
    save_output(&output, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["signals"].as_array().unwrap().len(), 3);
    assert_eq!(value["report"]["trades"].as_array().unwrap().len(), 2);
}

#[test]
fn test_signals_with_cli_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let closes: Vec<String> = (0..30)
        .map(|i| (100 + (i * 7) % 11 + i / 3).to_string())
        .collect();
    let refs: Vec<&str> = closes.iter().map(String::as_str).collect();
    let data = write_file(&dir, "prices.csv", &price_csv(&refs));

    let config = AppConfig::default();
    let args = StrategyArgs {
        kind: Some("classifier".to_string()),
        short_window: Some(2),
        long_window: Some(5),
        neighbors: Some(3),
        class_mode: Some(3),
        ..Default::default()
    };
    let strategy = args.apply(config.strategy).unwrap();

    let series = load_price_series(&data).unwrap();
    let output = signals::generate(&strategy, &series).unwrap();

    assert_eq!(output.signals.len(), 30 - 4 - 1);
    let table = format_signal_table(&output.signals, Some(5));
    assert!(table.contains("momentum"));
    assert!(table.contains("earlier rows omitted"));
}
