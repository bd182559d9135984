//! Pulling a JSON object out of a model reply.
//!
//! Models wrap JSON in code fences or chatter around it despite being told
//! not to. The parser sanitises the raw text, finds the first balanced
//! object and cleans every string value before handing it back.

use thiserror::Error;

use crate::domain::journal::truncate_chars;

/// Maximum accepted reply length in bytes.
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length of a single string value, in characters.
pub const MAX_FIELD_LENGTH: usize = 2_000;

const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JsonResponseError {
    #[error("response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("no JSON object in response")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(String),
}

/// Sanitising JSON extractor for model replies.
#[derive(Debug, Clone, Default)]
pub struct JsonResponseParser;

impl JsonResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Extracts and cleans the first JSON object in `response`.
    pub fn parse(&self, response: &str) -> Result<serde_json::Value, JsonResponseError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(JsonResponseError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let cleaned = sanitize_text(response);
        let json = extract_json_object(&cleaned).ok_or(JsonResponseError::NoJson)?;
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| JsonResponseError::Parse(e.to_string()))?;

        Ok(sanitize_value(value))
    }
}

/// Drops control characters (keeping line breaks and tabs) and known
/// prompt-injection markers.
pub fn sanitize_text(s: &str) -> String {
    let mut result: String = s
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect();
    for marker in INJECTION_MARKERS {
        result = result.replace(marker, "");
    }
    result
}

fn extract_json_object(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    let body = code_block_body(trimmed).unwrap_or(trimmed);
    let start = body.find('{')?;
    balanced_object(body, start)
}

fn code_block_body(s: &str) -> Option<&str> {
    for fence in ["```json", "```"] {
        if let Some(start) = s.find(fence) {
            let inner = &s[start + fence.len()..];
            if let Some(end) = inner.find("```") {
                return Some(inner[..end].trim());
            }
        }
    }
    None
}

fn balanced_object(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn sanitize_value(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}

fn sanitize_string(s: &str) -> String {
    let mut no_html = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => no_html.push(c),
            _ => {}
        }
    }
    truncate_chars(no_html.trim(), MAX_FIELD_LENGTH).to_string()
}
