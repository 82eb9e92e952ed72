//! Small formatting helpers shared by the overlays.

use chrono::{DateTime, Utc};

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}

/// Compact count: `950`, `1.2k`, `3.4M`.
pub fn format_count(n: u64) -> String {
    if n < 1_000 {
        return n.to_string();
    }
    // Units are chosen after rounding to one decimal, so 999_960 is `1M`.
    let tenths_k = (n as f64 / 100.0).round();
    if tenths_k < 10_000.0 {
        compact(tenths_k / 10.0, "k")
    } else {
        compact(n as f64 / 1_000_000.0, "M")
    }
}

fn compact(value: f64, suffix: &str) -> String {
    let s = format!("{:.1}", value);
    let s = s.strip_suffix(".0").unwrap_or(&s);
    format!("{}{}", s, suffix)
}

/// `Jan 26, 2011`, or `unknown` when the upstream omitted it.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => "unknown".to_string(),
    }
}
