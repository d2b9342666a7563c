//! Parsing of generated scenarios.
//!
//! Structural problems (bad JSON, no `scenarios` array, a scenario without
//! a title) reject the whole answer. Unknown enum values are logged and
//! replaced with defaults.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::models::{Category, DeviceType, Priority, ScenarioDraft, TestCaseDraft};

static JSON_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid response structure: scenarios array not found")]
    MissingScenarios,

    #[error("Scenario {0}: title is required")]
    MissingTitle(usize),
}

/// Extract and normalize scenarios from a model answer.
pub fn parse_scenarios(response: &str) -> Result<Vec<ScenarioDraft>, ParseError> {
    let json_text = match JSON_BLOCK_RE.captures(response).and_then(|c| c.get(1)) {
        Some(block) => block.as_str(),
        None => response.trim(),
    };

    let parsed: Value = serde_json::from_str(json_text)?;
    let scenarios = parsed
        .get("scenarios")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingScenarios)?;

    scenarios
        .iter()
        .enumerate()
        .map(|(idx, raw)| parse_scenario(idx, raw))
        .collect()
}

fn parse_scenario(idx: usize, raw: &Value) -> Result<ScenarioDraft, ParseError> {
    let title = match raw.get("title") {
        Some(Value::String(t)) if !t.is_empty() => t.clone(),
        _ => return Err(ParseError::MissingTitle(idx + 1)),
    };

    let category = enum_field(raw, "category", Category::parse, "POSITIVE");
    let priority = enum_field(raw, "priority", Priority::parse, "MEDIUM");
    let device_type = enum_field(raw, "deviceType", DeviceType::parse, "BOTH");

    let test_cases = match raw.get("testCases") {
        Some(Value::Array(cases)) => cases
            .iter()
            .enumerate()
            .map(|(tc_idx, tc)| TestCaseDraft {
                step: step_number(tc.get("step")).unwrap_or(tc_idx as i32 + 1),
                action: loose_string(tc.get("action")),
                expected: loose_string(tc.get("expected")),
            })
            .collect(),
        _ => Vec::new(),
    };

    let description = raw
        .get("description")
        .filter(|v| is_truthy(v))
        .map(to_display_string);

    Ok(ScenarioDraft {
        title,
        description,
        category,
        priority,
        device_type,
        test_cases,
    })
}

/// Uppercase and look up an enum field, falling back to its default.
fn enum_field<T: Default>(
    raw: &Value,
    key: &str,
    parse: fn(&str) -> Option<T>,
    default_name: &str,
) -> T {
    let value = raw.get(key);
    let parsed = value
        .and_then(Value::as_str)
        .and_then(|s| parse(&s.to_uppercase()));

    parsed.unwrap_or_else(|| {
        let shown = value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "undefined".to_string());
        warn!(
            field = key,
            value = %shown,
            "Invalid {} in generated scenario, defaulting to {}",
            key,
            default_name
        );
        T::default()
    })
}

fn step_number(value: Option<&Value>) -> Option<i32> {
    let Some(Value::Number(n)) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64).then_some(f as i32)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String coercion for step text: missing or falsy values become empty.
fn loose_string(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => to_display_string(v),
        _ => String::new(),
    }
}

fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
