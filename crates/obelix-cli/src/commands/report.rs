//! 터미널 출력용 표 포맷터.

use obelix_core::{DecimalExt, SignalSeries};
use obelix_strategy::available_strategies;
use std::fmt::Write;

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// 신호 시계열을 표로 만듭니다.
///
/// 지표 열은 첫 행의 지표 이름(정렬됨)을 따릅니다. `limit`이 있으면
/// 마지막 `limit`개 행만 출력합니다.
pub fn format_signal_table(series: &SignalSeries, limit: Option<usize>) -> String {
    let indicator_names: Vec<&str> = series
        .points()
        .first()
        .map(|p| p.indicators.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut out = String::new();
    let _ = write!(out, "{:<20} {:>14} {:>6}", "timestamp", "close", "signal");
    for name in &indicator_names {
        let _ = write!(out, " {:>14}", name);
    }
    out.push('\n');

    let skip = limit.map_or(0, |n| series.len().saturating_sub(n));
    for point in series.iter().skip(skip) {
        let _ = write!(
            out,
            "{:<20} {:>14} {:>6}",
            point.timestamp().format("%Y-%m-%d %H:%M").to_string(),
            point.close().round_half_away(4).to_string(),
            point.signal.to_string()
        );
        for name in &indicator_names {
            match point.indicator(name) {
                Some(value) => {
                    let _ = write!(out, " {:>14}", value.round_half_away(4).to_string());
                }
                None => {
                    let _ = write!(out, " {:>14}", "-");
                }
            }
        }
        out.push('\n');
    }

    if skip > 0 {
        let _ = writeln!(out, "... {} earlier rows omitted", skip);
    }
    out
}

/// 사용 가능한 전략 목록 문자열.
pub fn format_available_strategies() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n📋 사용 가능한 전략 목록:");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "  전략 타입    | 이름              | 설명");
    let _ = writeln!(
        out,
        "  ─────────────────────────────────────────────────────────────"
    );
    for meta in available_strategies() {
        let _ = writeln!(
            out,
            "  {:<12} | {:<17} | {}",
            meta.kind, meta.name, meta.description
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "기본 설정 (config/default.toml의 [strategy] 섹션):");
    for meta in available_strategies() {
        let _ = writeln!(out, "  type = \"{}\"  {}", meta.kind, meta.default_config);
    }
    out
}

/// 사용 가능한 전략 목록 출력
pub fn print_available_strategies() {
    print!("{}", format_available_strategies());
}
