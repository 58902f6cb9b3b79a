//! Typed dashboard model and the decode boundary for analysis payloads.
//!
//! The analysis endpoint returns untrusted JSON. Nothing enters the typed
//! model without passing through [`validate`], which normalizes the loose
//! wire shape (optional `series`/`columns`/`xAxisKey` keys on every widget)
//! into an explicit chart/table sum type. A single malformed widget is
//! dropped with a warning rather than sinking the whole payload; only a
//! payload without a `widgets` array is rejected outright.

use crate::format::CellFormat;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// One data row: field name to JSON scalar.
pub type Row = serde_json::Map<String, Value>;

pub const DEFAULT_X_AXIS_KEY: &str = "name";
pub const DEFAULT_TAB: &str = "Overview";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("analysis payload is not a JSON object")]
    NotAnObject,
    #[error("analysis payload has no widgets array")]
    MissingWidgets,
}

/// The full decoded analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    #[serde(rename = "dataset_title")]
    pub title: String,
    #[serde(rename = "dataset_summary")]
    pub summary: String,
    pub kpis: Vec<KpiCard>,
    pub widgets: Vec<Widget>,
    pub insights: Vec<Insight>,
}

/// A headline metric card, independent of widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: KpiValue,
    #[serde(rename = "subValue", default, skip_serializing_if = "Option::is_none")]
    pub sub_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(rename = "trendValue", default, skip_serializing_if = "Option::is_none")]
    pub trend_value: Option<String>,
    #[serde(rename = "iconHint", default, skip_serializing_if = "Option::is_none")]
    pub icon_hint: Option<IconHint>,
}

/// KPI values arrive either preformatted (string) or raw (number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KpiValue {
    Number(f64),
    Text(String),
}

impl Default for KpiValue {
    fn default() -> Self {
        KpiValue::Text(String::new())
    }
}

impl std::fmt::Display for KpiValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KpiValue::Number(n) => write!(f, "{}", crate::format::display_number(*n)),
            KpiValue::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconHint {
    Money,
    Users,
    Box,
    Activity,
    Time,
    Chart,
    Alert,
}

/// One dashboard panel. The body distinguishes charts from tables so render
/// code matches exhaustively instead of sniffing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub tab: String,
    pub data: Vec<Row>,
    pub body: WidgetBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetBody {
    Chart(ChartConfig),
    Table(TableConfig),
}

impl Widget {
    pub fn is_chart(&self) -> bool {
        matches!(self.body, WidgetBody::Chart(_))
    }

    pub fn as_chart(&self) -> Option<&ChartConfig> {
        match &self.body {
            WidgetBody::Chart(cfg) => Some(cfg),
            WidgetBody::Table(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x_axis_key: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Area,
    Bar,
    Line,
    Pie,
    Composed,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Area,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Composed,
        ChartKind::Pie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Area => "area",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Composed => "composed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Area => "Area Chart",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Composed => "Composed (Line + Bar)",
        }
    }
}

/// One plotted metric within a chart widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub format: CellFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: InsightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Negative,
    #[default]
    Neutral,
}

// ── wire shape ────────────────────────────────────────────────────────────

/// The loose widget object as it appears on the wire: every variant-specific
/// field optional, discriminated by the `type` tag.
#[derive(Debug, Serialize, Deserialize)]
struct RawWidget {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "default_tab")]
    tab: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "xAxisKey", default, skip_serializing_if = "Option::is_none")]
    x_axis_key: Option<String>,
    #[serde(default)]
    data: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    series: Option<Vec<Series>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<Column>>,
}

fn default_tab() -> String {
    DEFAULT_TAB.to_string()
}

impl From<&Widget> for RawWidget {
    fn from(w: &Widget) -> Self {
        let (kind, x_axis_key, series, columns) = match &w.body {
            WidgetBody::Chart(cfg) => (
                cfg.kind.as_str().to_string(),
                Some(cfg.x_axis_key.clone()),
                Some(cfg.series.clone()),
                None,
            ),
            WidgetBody::Table(cfg) => {
                ("table".to_string(), None, None, Some(cfg.columns.clone()))
            }
        };
        RawWidget {
            id: w.id.clone(),
            title: w.title.clone(),
            description: w.description.clone(),
            tab: w.tab.clone(),
            kind,
            x_axis_key,
            data: w.data.clone(),
            series,
            columns,
        }
    }
}

impl Serialize for Widget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawWidget::from(self).serialize(serializer)
    }
}

// ── validation ────────────────────────────────────────────────────────────

/// Decode and normalize an untrusted payload value.
///
/// Returns the typed payload plus warnings for every element that had to be
/// dropped or synthesized. Fails only when the payload is structurally
/// unusable (not an object, or no widgets array).
pub fn validate(raw: &Value) -> Result<(DashboardPayload, Vec<String>), ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;
    let raw_widgets = obj
        .get("widgets")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingWidgets)?;

    let mut warnings = Vec::new();

    let kpis = lenient_array::<KpiCard>(obj.get("kpis"), "KPI card", &mut warnings);
    let insights = lenient_array::<Insight>(obj.get("insights"), "insight", &mut warnings);

    let mut widgets: Vec<Widget> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    for (idx, value) in raw_widgets.iter().enumerate() {
        let raw: RawWidget = match serde_json::from_value(value.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warnings.push(format!("dropping malformed widget #{idx}: {e}"));
                continue;
            }
        };
        let Some(widget) = normalize_widget(raw, idx, &mut warnings) else {
            continue;
        };
        if !seen_ids.insert(widget.id.clone()) {
            warnings.push(format!("dropping widget with duplicate id '{}'", widget.id));
            continue;
        }
        widgets.push(widget);
    }

    let payload = DashboardPayload {
        title: string_field(obj, "dataset_title"),
        summary: string_field(obj, "dataset_summary"),
        kpis,
        widgets,
        insights,
    };
    Ok((payload, warnings))
}

fn string_field(obj: &Row, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn lenient_array<T: serde::de::DeserializeOwned>(
    value: Option<&Value>,
    what: &str,
    warnings: &mut Vec<String>,
) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warnings.push(format!("dropping malformed {what} #{idx}: {e}"));
                None
            }
        })
        .collect()
}

fn normalize_widget(raw: RawWidget, index: usize, warnings: &mut Vec<String>) -> Option<Widget> {
    let body = if raw.kind == "table" {
        let columns = match raw.columns {
            Some(cols) if !cols.is_empty() => cols,
            _ => {
                warnings.push(format!(
                    "table widget '{}' has no columns; inferring from data",
                    raw.id
                ));
                infer_columns(&raw.data)
            }
        };
        WidgetBody::Table(TableConfig { columns })
    } else {
        let Ok(kind) = serde_json::from_value::<ChartKind>(Value::String(raw.kind.clone())) else {
            warnings.push(format!(
                "dropping widget '{}' with unknown type '{}'",
                raw.id, raw.kind
            ));
            return None;
        };
        WidgetBody::Chart(ChartConfig {
            kind,
            x_axis_key: raw
                .x_axis_key
                .unwrap_or_else(|| DEFAULT_X_AXIS_KEY.to_string()),
            series: raw.series.unwrap_or_default(),
        })
    };

    let id = if raw.id.is_empty() {
        format!("w{}", index + 1)
    } else {
        raw.id
    };
    Some(Widget {
        id,
        title: raw.title,
        description: raw.description,
        tab: raw.tab,
        data: raw.data,
        body,
    })
}

/// Fallback column inference for tables the model sent without a `columns`
/// list: every field of the first row, rendered as plain strings.
pub fn infer_columns(data: &[Row]) -> Vec<Column> {
    data.first()
        .map(|row| {
            row.keys()
                .map(|key| Column {
                    key: key.clone(),
                    label: key.clone(),
                    format: CellFormat::String,
                })
                .collect()
        })
        .unwrap_or_default()
}
