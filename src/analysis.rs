//! The analysis gateway: one CSV document in, one validated dashboard
//! payload out.
//!
//! The remote model is instructed to answer with strict JSON, but replies
//! still show up wrapped in markdown fences or prose from time to time, so
//! the response body is fenced-stripped before parsing and then pushed
//! through the schema validator. One outbound request per call, no retries;
//! the user decides whether to try again.

use crate::schema::{self, DashboardPayload, ValidationError};
use crate::settings::Settings;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use thiserror::Error;

pub type AnalysisOutcome = Result<(DashboardPayload, Vec<String>), AnalysisError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no API key configured; set GEMINI_API_KEY or add one in settings")]
    MissingApiKey,
    #[error("analysis request failed: {0}")]
    Transport(String),
    #[error("the analysis service returned an empty response")]
    EmptyResponse,
    #[error("the analysis response could not be understood")]
    Format,
    #[error("analysis payload rejected: {0}")]
    Schema(#[from] ValidationError),
}

pub const SYSTEM_PROMPT: &str = r##"You are DashForge, an expert AI data analyst.
Your goal is to analyze any given CSV dataset and generate a rich, multi-tab dashboard configuration.

## DYNAMIC CONTEXT ANALYSIS
1. **Infer the Domain**: Determine if data is "E-commerce", "Healthcare", "Finance", etc.
2. **Organize into Tabs**: Group visualizations into logical tabs. Common patterns:
   - "Overview": Top-level KPIs and aggregate charts.
   - "Trends": Time-series analysis.
   - "Breakdown": Categorical distribution (Products, Regions, Departments).
   - "Details": Granular tables.

## RESPONSE FORMAT (Strict JSON)
Return a single JSON object:

{
  "dataset_title": "<Professional Dashboard Title>",
  "dataset_summary": "<Executive summary string>",
  "kpis": [
    {
      "id": "kpi_1",
      "label": "<Metric Name>",
      "value": "<Formatted Value>",
      "subValue": "<Context>",
      "trend": "up|down|neutral",
      "trendValue": "<% change>",
      "iconHint": "money|users|box|activity|time|chart|alert"
    }
  ],
  "widgets": [
    {
      "id": "w1",
      "tab": "Overview",
      "title": "<Chart Title>",
      "description": "<Subtitle>",
      "type": "area",
      "xAxisKey": "month",
      "data": [{"month": "Jan", "sales": 100}],
      "series": [{"key": "sales", "name": "Sales", "color": "#3B82F6"}]
    },
    {
      "id": "w2",
      "tab": "Details",
      "title": "Top Performers",
      "type": "table",
      "columns": [
        {"key": "name", "label": "Product", "format": "string"},
        {"key": "revenue", "label": "Revenue", "format": "currency"},
        {"key": "margin", "label": "Margin", "format": "percent"}
      ],
      "data": [{"name": "Item A", "revenue": 5000, "margin": 12.5}]
    }
  ],
  "insights": [
    { "title": "<Insight Title>", "description": "<Text>", "type": "positive|negative|neutral" }
  ]
}

## RULES
- **Widget Types**: Use 'area' for trends, 'bar' for comparisons, 'pie' for distribution, 'composed' for multi-metric trends, 'table' for detailed lists.
- **Colors**: Use #3B82F6 (Blue), #10B981 (Emerald), #F59E0B (Amber), #EF4444 (Red), #8B5CF6 (Purple).
- **Data Limits**: Limit chart arrays to ~20 points. Limit table rows to top 10 items.
- **Nulls**: Filter or zero-fill null values.
"##;

static HTTP: Lazy<reqwest::blocking::Client> = Lazy::new(reqwest::blocking::Client::new);

// ── wire types for the generateContent endpoint ──────────────────────────

#[derive(Debug, Serialize, PartialEq)]
pub struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, PartialEq)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ReplyContent,
}

#[derive(Debug, Deserialize, Default)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize, Default)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

// ── gateway ───────────────────────────────────────────────────────────────

pub struct Analyzer {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl Analyzer {
    pub fn from_settings(settings: &Settings) -> Self {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var("GEMINI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            });
        Self {
            endpoint: settings.api_endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            timeout: Duration::from_secs(settings.request_timeout_secs.max(1)),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request body sent alongside one CSV document.
    pub fn request_body(&self, csv_text: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        text: "Here is the CSV data to analyze:".to_string(),
                    },
                    Part {
                        text: csv_text.to_string(),
                    },
                ],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 8192,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    /// Send the CSV off for analysis and validate the reply. Blocks until
    /// the request settles or the configured timeout fires.
    pub fn analyze(&self, csv_text: &str) -> AnalysisOutcome {
        let Some(key) = self.api_key.as_deref() else {
            return Err(AnalysisError::MissingApiKey);
        };
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, key
        );

        tracing::info!(model = %self.model, csv_bytes = csv_text.len(), "requesting dashboard analysis");
        let response = HTTP
            .post(&url)
            .timeout(self.timeout)
            .json(&self.request_body(csv_text))
            .send()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::debug!(%status, body = %body, "analysis endpoint returned an error");
            return Err(AnalysisError::Transport(format!(
                "analysis endpoint returned {status}"
            )));
        }

        let reply: GenerateResponse = response.json().map_err(|e| {
            tracing::debug!(error = %e, "undecodable analysis envelope");
            AnalysisError::Format
        })?;
        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        let cleaned = strip_code_fences(&text);
        let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
            tracing::debug!(error = %e, raw = %text, "analysis reply was not valid JSON");
            AnalysisError::Format
        })?;
        let (payload, warnings) = schema::validate(&value)?;
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        tracing::info!(
            widgets = payload.widgets.len(),
            kpis = payload.kpis.len(),
            "analysis complete"
        );
        Ok((payload, warnings))
    }
}

/// Remove markdown code fences the model sometimes wraps its JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Run one analysis on a worker thread. The receiver is the in-flight
/// guard: the GUI polls it each frame and a new analysis can only start
/// once this one has settled.
pub fn spawn_analysis(
    analyzer: Analyzer,
    csv_text: String,
    ctx: eframe::egui::Context,
) -> Receiver<AnalysisOutcome> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let outcome = analyzer.analyze(&csv_text);
        if let Err(e) = &outcome {
            tracing::error!("analysis failed: {e}");
        }
        let _ = tx.send(outcome);
        ctx.request_repaint();
    });
    rx
}
