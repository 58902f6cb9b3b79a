//! Best-effort CSV sniffing for the preview screen.
//!
//! This is deliberately not a CSV engine: cells are split on bare commas
//! with surrounding quotes trimmed, which is enough for a preview table.
//! The inferred types are advisory only; the analysis request always gets
//! the raw CSV text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;

pub const MAX_SAMPLE_ROWS: usize = 5;
const MAX_SAMPLE_VALUES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numerical,
    DateTime,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numerical => write!(f, "Numerical"),
            ColumnType::DateTime => write!(f, "Date/Time"),
            ColumnType::Categorical => write!(f, "Categorical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred: ColumnType,
    /// Up to three non-empty sample values, for display.
    pub samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SniffReport {
    pub headers: Vec<String>,
    pub sample_rows: Vec<Vec<String>>,
    pub columns: Vec<ColumnProfile>,
}

/// Inspect the head of a CSV document: headers, up to five sample rows, and
/// a per-column type guess.
pub fn sniff(csv_text: &str) -> SniffReport {
    let lines: Vec<&str> = csv_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    let Some((first, rest)) = lines.split_first() else {
        return SniffReport::default();
    };

    let headers = parse_line(first);
    let sample_rows: Vec<Vec<String>> = rest
        .iter()
        .take(MAX_SAMPLE_ROWS)
        .map(|line| parse_line(line))
        .collect();

    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = sample_rows
                .iter()
                .filter_map(|row| row.get(idx))
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .collect();
            ColumnProfile {
                name: name.clone(),
                inferred: infer_type(&values),
                samples: values
                    .iter()
                    .take(MAX_SAMPLE_VALUES)
                    .map(|v| v.to_string())
                    .collect(),
            }
        })
        .collect();

    SniffReport {
        headers,
        sample_rows,
        columns,
    }
}

fn parse_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| {
            cell.trim()
                .trim_start_matches('"')
                .trim_end_matches('"')
                .to_string()
        })
        .collect()
}

/// A column is Numerical if every non-empty sample parses as a number, else
/// Date/Time if every sample parses as a date without also being a bare
/// number, else Categorical.
fn infer_type(values: &[&str]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::Categorical;
    }
    if values.iter().all(|v| is_number(v)) {
        return ColumnType::Numerical;
    }
    if values.iter().all(|v| is_date(v) && !is_number(v)) {
        return ColumnType::DateTime;
    }
    ColumnType::Categorical
}

fn is_number(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y",
];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn is_date(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    if DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
}
