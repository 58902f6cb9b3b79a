//! Display formatting for cell and axis values.
//!
//! All formatting here is deterministic and locale-free: the thousands
//! separator is always `,` and magnitude abbreviations always use one
//! decimal place. The analysis payload travels through `serde_json`, so
//! values arrive as [`serde_json::Value`] scalars.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a table column renders its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    Currency,
    Number,
    Percent,
    #[default]
    String,
}

/// Format a JSON scalar under the given rule. Non-numeric values pass
/// through unchanged regardless of the rule.
pub fn format_value(value: &Value, format: CellFormat) -> String {
    let Some(n) = value.as_f64() else {
        return display_scalar(value);
    };
    match format {
        CellFormat::Currency => {
            if n >= 1_000_000.0 {
                format!("${:.1}M", n / 1_000_000.0)
            } else if n >= 1_000.0 {
                format!("${:.1}K", n / 1_000.0)
            } else {
                format!("${n:.0}")
            }
        }
        CellFormat::Percent => format!("{n:.1}%"),
        CellFormat::Number | CellFormat::String => abbreviate(n),
    }
}

/// The auto rule used for axis ticks and untyped numeric cells: abbreviate
/// large magnitudes, group thousands below that.
pub fn abbreviate(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        group_thousands(n)
    }
}

/// Render a non-numeric JSON scalar for display.
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Group the integer digits of `n` with commas, keeping up to two decimals.
fn group_thousands(n: f64) -> String {
    let rendered = format!("{:.2}", n.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rendered.as_str(), ""),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d);
    }

    let mut out = String::new();
    if n < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Compact rendering for a bare number (KPI values and the like): integers
/// lose the trailing `.0`, everything else keeps its digits.
pub fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
