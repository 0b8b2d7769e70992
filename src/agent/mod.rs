// File: ./src/agent/mod.rs
//! Delegated extraction through an external black-box agent process.
//!
//! The boundary is failure-opaque: launch errors, timeouts, non-zero exits
//! and malformed envelopes all log and yield `None`, never an error. Nothing
//! past this module knows whether the agent ran at all.
pub mod contract;

use crate::config::Config;
use crate::session::ChatId;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Extra wall-clock allowance on top of the agent's own timeout so the agent
/// gets to time out first and report through its envelope.
const TIMEOUT_GRACE_SECS: u64 = 5;

/// Invokes the external agent with a textual prompt and returns its textual
/// answer. `None` means the transport failed; the caller treats it exactly
/// like an unusable answer.
pub trait AgentClient {
    fn invoke(
        &self,
        chat_id: ChatId,
        prompt: &str,
    ) -> impl std::future::Future<Output = Option<String>> + Send;
}

/// Builds the simple-mode request: a bare JSON array of event rows, no
/// clarify semantics.
pub fn simple_extraction_prompt(text: &str, tz_name: &str) -> String {
    format!(
        "Извлеки события из текста/афиши. Верни только JSON-массив без пояснений. \
         Каждый объект: date(YYYY-MM-DD), start_time(HH:MM), end_time(HH:MM|null), \
         description, address, recurrent(one of: never,daily,weekly,monthly,annual). \
         Часовой пояс пользователя: {tz_name}. \
         Если год не указан, выбери ближайшую будущую дату. Если это билет/афиша — \
         постарайся правильно извлечь дату, время и адрес.\n\nТекст:\n{text}"
    )
}

/// Builds the clarify-capable request: a strict status object that may carry
/// a follow-up question instead of events.
pub fn clarify_extraction_prompt(text: &str, tz_name: &str) -> String {
    format!(
        "Ты извлекаешь события из OCR/голосового текста для календаря. \
         Верни СТРОГО JSON-объект БЕЗ пояснений. \
         Если данных достаточно: {{\"status\":\"ok\",\"events\":[{{date,start_time,end_time,description,address,recurrent}}]}}. \
         Если данных недостаточно/двусмысленно: {{\"status\":\"clarify\",\"question\":\"...\"}}. \
         date=YYYY-MM-DD, time=HH:MM, recurrent in never|daily|weekly|monthly|annual. \
         Часовой пояс пользователя: {tz_name}.\n\nТекст:\n{text}"
    )
}

// The agent CLI wraps its textual answer in a JSON envelope on stdout.
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<EnvelopeResult>,
}

#[derive(Deserialize, Default)]
struct EnvelopeResult {
    #[serde(default)]
    payloads: Vec<EnvelopePayload>,
}

#[derive(Deserialize)]
struct EnvelopePayload {
    #[serde(default)]
    text: String,
}

/// Joins the envelope's payload texts into the agent's answer. A missing
/// `result` is an empty answer, not an error.
fn unwrap_envelope(stdout: &str) -> Option<String> {
    match serde_json::from_str::<Envelope>(stdout) {
        Ok(envelope) => {
            let parts: Vec<String> = envelope
                .result
                .unwrap_or_default()
                .payloads
                .into_iter()
                .map(|p| p.text)
                .collect();
            Some(parts.join("\n"))
        }
        Err(e) => {
            log::warn!("agent envelope parse failed: {e}");
            None
        }
    }
}

/// [`AgentClient`] backed by the configured agent CLI, one subprocess per
/// call with a bounded timeout.
#[derive(Debug, Clone)]
pub struct ProcessAgent {
    bin: String,
    extra_args: Vec<String>,
    timeout_secs: u64,
    session_prefix: String,
}

impl ProcessAgent {
    pub fn new(config: &Config) -> Self {
        Self {
            bin: config.agent_bin.clone(),
            extra_args: config.agent_args.clone(),
            timeout_secs: config.agent_timeout_secs,
            session_prefix: config.agent_session_prefix.clone(),
        }
    }
}

impl AgentClient for ProcessAgent {
    async fn invoke(&self, chat_id: ChatId, prompt: &str) -> Option<String> {
        let session_id = format!("{}_{}", self.session_prefix, chat_id);

        let mut command = Command::new(&self.bin);
        command
            .arg("agent")
            .arg("--session-id")
            .arg(&session_id)
            .arg("--message")
            .arg(prompt)
            .arg("--json")
            .arg("--timeout")
            .arg(self.timeout_secs.to_string())
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let deadline = Duration::from_secs(self.timeout_secs + TIMEOUT_GRACE_SECS);
        let output = match timeout(deadline, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                log::warn!("agent launch failed ({}): {e}", self.bin);
                return None;
            }
            Err(_) => {
                log::warn!("agent call timed out after {}s", deadline.as_secs());
                return None;
            }
        };

        if !output.status.success() {
            log::warn!(
                "agent exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        unwrap_envelope(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_joins_payload_texts_in_order() {
        let raw = r#"{"result": {"payloads": [{"text": "first"}, {"text": "second"}]}}"#;
        assert_eq!(unwrap_envelope(raw), Some("first\nsecond".to_string()));
    }

    #[test]
    fn envelope_without_result_is_an_empty_answer() {
        assert_eq!(unwrap_envelope(r#"{"status": "done"}"#), Some(String::new()));
    }

    #[test]
    fn malformed_envelope_is_no_result() {
        assert_eq!(unwrap_envelope("plain text, not json"), None);
    }
}
