// src/cli/display.rs
use std::path::Path;

use serde_json::{Map, Value};

use crate::api::{DateEntry, OverviewStats, QueryResult, Scalar, StatKind, StatsReport};
use crate::export::ExportFormat;

fn or_zero(value: Option<&Scalar>) -> String {
    or_default(value, "0")
}

fn or_na(value: Option<&Scalar>) -> String {
    or_default(value, "N/A")
}

fn or_default(value: Option<&Scalar>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_null() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Join lines into a block, each line newline-terminated
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Summary printed after a date extraction has been exported
pub fn extract_summary(date: &str, result: &QueryResult, format: ExportFormat, output: &Path) -> String {
    let stats = result.stats();
    block(vec![
        "\n✓ Export completed successfully!".to_string(),
        format!("  Date: {}", date),
        format!("  Total Targets: {}", or_zero(stats.total_targets.as_ref())),
        format!("  Total Requests: {}", or_zero(stats.total_requests.as_ref())),
        format!("  Unique Hosts: {}", or_zero(stats.unique_hosts.as_ref())),
        format!("  Format: {}", format.extension().to_uppercase()),
        format!("  Output: {}", output.display()),
    ])
}

/// Search statistics, followed by the first `limit` targets when asked
pub fn search_summary(result: &QueryResult, limit: Option<usize>) -> String {
    let stats = result.stats();
    let extra = |key: &str, fallback: &str| {
        stats.extra_field(key).map(plain).unwrap_or_else(|| fallback.to_string())
    };

    let mut out = block(vec![
        "\nSearch Results:".to_string(),
        format!("  Total Targets: {}", or_zero(stats.total_targets.as_ref())),
        format!("  Total Requests: {}", or_zero(stats.total_requests.as_ref())),
        format!("  Unique IPs: {}", or_zero(stats.unique_ips.as_ref())),
        format!("  Active Days: {}", extra("active_days", "0")),
        format!("  First Seen: {}", extra("first_seen", "N/A")),
        format!("  Last Seen: {}", extra("last_seen", "N/A")),
        format!("  Types: {}", stats.type_names().join(", ")),
        format!("  Methods: {}", stats.method_names().join(", ")),
    ]);

    if let Some(limit) = limit {
        out.push_str(&target_listing(result, limit));
    }
    out
}

/// Numbered list of the first `limit` targets
pub fn target_listing(result: &QueryResult, limit: usize) -> String {
    let targets = result.targets();
    if limit == 0 || targets.is_empty() {
        return String::new();
    }

    let shown = limit.min(targets.len());
    let mut lines = vec![format!("\nShowing first {} targets:", shown)];
    for (i, target) in targets.iter().take(shown).enumerate() {
        lines.push(format!("\n  [{}] {}", i + 1, or_na(target.host.as_ref())));
        if let Some(ip) = target.ip.as_ref().filter(|v| !v.is_null()) {
            lines.push(format!("      IP: {}", ip));
        }
        if let Some(detected) = target.detected_at.as_ref().filter(|v| !v.is_null()) {
            lines.push(format!("      Detected: {}", detected));
        }
    }
    block(lines)
}

/// Statistics view: key/value lines for the overview, a table otherwise
pub fn stats_report(kind: StatKind, report: &StatsReport) -> String {
    match report {
        StatsReport::Overview(overview) => overview_lines(overview),
        StatsReport::Table(rows) => stats_table(kind, rows),
    }
}

fn overview_lines(stats: &OverviewStats) -> String {
    block(vec![
        "\n=== Overview Statistics ===".to_string(),
        format!("Total Targets: {}", or_zero(stats.total_targets.as_ref())),
        format!("Total Requests: {}", or_zero(stats.total_requests.as_ref())),
        format!("Total Hosts: {}", or_zero(stats.total_hosts.as_ref())),
        format!("Total IPs: {}", or_zero(stats.total_ips.as_ref())),
        format!("Total Imports: {}", or_zero(stats.total_imports.as_ref())),
        format!("Last Detected: {}", or_na(stats.last_detected.as_ref())),
    ])
}

fn stats_table(kind: StatKind, rows: &[Map<String, Value>]) -> String {
    let mut lines = vec![format!("\n=== Statistics ({}) ===", kind)];

    if let Some(first) = rows.first() {
        let keys: Vec<&String> = first.keys().collect();
        let header = keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(" | ");
        let separator = "-".repeat(header.len() + 10);
        lines.push(header);
        lines.push(separator);

        for row in rows {
            let values: Vec<String> = keys
                .iter()
                .map(|k| row.get(*k).map(plain).unwrap_or_default())
                .collect();
            lines.push(values.join(" | "));
        }
    }
    block(lines)
}

/// Table of dates with data; `limit` truncates locally
pub fn dates_table(dates: &[DateEntry], limit: Option<usize>) -> String {
    if dates.is_empty() {
        return "No dates with data available\n".to_string();
    }

    let mut lines = vec![
        format!("\n=== Available Dates ({} total) ===", dates.len()),
        "Date       | Targets | Requests".to_string(),
        "-".repeat(40),
    ];

    let shown = limit.unwrap_or(dates.len()).min(dates.len());
    lines.extend(dates[..shown].iter().map(|entry| {
        format!(
            "{:<10} | {:>7} | {:>8}",
            or_na(entry.date.as_ref()),
            or_zero(entry.target_count.as_ref()),
            or_zero(entry.request_count.as_ref())
        )
    }));

    if shown < dates.len() {
        lines.push(format!("\n... and {} more dates", dates.len() - shown));
    }
    block(lines)
}
