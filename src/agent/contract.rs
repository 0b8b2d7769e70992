// File: ./src/agent/contract.rs
//! Defensive parsing of the delegated extractor's textual output.
//!
//! The agent is asked for strict JSON but answers with free text: the JSON
//! may be wrapped in a fenced code block and surrounded by prose. Parsing is
//! best-effort — locate the first well-formed region, validate the schema
//! after parse, and degrade to the empty outcome on anything malformed.
use crate::model::{EventDraft, ParsedEvent};
use serde_json::Value;

/// Outcome of a clarify-capable agent call.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// Zero or more schema-valid events.
    Events(Vec<ParsedEvent>),
    /// The agent asked a follow-up question instead of extracting.
    Clarify(String),
    /// Nothing usable came back.
    Empty,
}

/// Strips a markdown code fence (```json ... ``` or ``` ... ```) when one is
/// present, returning the inner block.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    trimmed
}

/// Best-effort region location: the first `open` through the last `close`.
fn json_region(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start { Some(&text[start..=end]) } else { None }
}

/// Maps an array of draft rows to events, dropping rows that fail schema
/// validation.
fn rows_to_events(rows: &[Value]) -> Vec<ParsedEvent> {
    rows.iter()
        .filter(|row| row.is_object())
        .filter_map(|row| serde_json::from_value::<EventDraft>(row.clone()).ok())
        .filter_map(EventDraft::into_event)
        .collect()
}

/// Simple mode: the agent was asked for a bare JSON array of event rows.
/// Clarify semantics are ignored here by design.
pub fn parse_simple_payload(raw: &str) -> Vec<ParsedEvent> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let text = strip_code_fence(raw);

    if let Ok(Value::Array(rows)) = serde_json::from_str::<Value>(text) {
        return rows_to_events(&rows);
    }

    let Some(region) = json_region(text, '[', ']') else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(region) {
        Ok(Value::Array(rows)) => rows_to_events(&rows),
        _ => {
            log::debug!("agent array payload did not parse");
            Vec::new()
        }
    }
}

/// Clarify-capable mode: `{status: "ok", events: [...]}` or
/// `{status: "clarify", question: "..."}`.
pub fn parse_clarify_payload(raw: &str) -> AgentReply {
    if raw.trim().is_empty() {
        return AgentReply::Empty;
    }
    let text = strip_code_fence(raw);

    let payload = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => {
            let Some(region) = json_region(text, '{', '}') else {
                return AgentReply::Empty;
            };
            match serde_json::from_str::<Value>(region) {
                Ok(value) => value,
                Err(e) => {
                    log::debug!("agent object payload did not parse: {e}");
                    return AgentReply::Empty;
                }
            }
        }
    };

    let Some(object) = payload.as_object() else {
        return AgentReply::Empty;
    };

    let status = object
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if status == "clarify" {
        let question = object
            .get("question")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();
        return if question.is_empty() {
            AgentReply::Empty
        } else {
            AgentReply::Clarify(question)
        };
    }

    match object.get("events") {
        Some(Value::Array(rows)) => AgentReply::Events(rows_to_events(rows)),
        _ => AgentReply::Empty,
    }
}
