// File: src/pipeline.rs
//! Central pipeline: extraction cascade plus the clarify/confirm dialogue.
//! This is the single source of truth for the conversational contract; any
//! transport (bot, console) delegates here and renders the returned replies.
use crate::agent::{AgentClient, clarify_extraction_prompt, contract, simple_extraction_prompt};
use crate::extract::{Cascade, ExtractContext, Extractor, RuleExtractor, TicketExtractor};
use crate::extract::sanitize::sanitize;
use crate::ingest::ProducerKind;
use crate::model::preview::{preview_blocks, saved_lines};
use crate::model::{EventDraft, ParsedEvent};
use crate::session::{
    ChatId, ChatState, PendingClarification, PendingConfirmation, SessionStore,
};
use crate::store::{EventRecord, EventStore};
use anyhow::Result;
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Marker prepended to each user clarification when it is appended to the
/// accumulated source text. Part of the agent-facing text corpus.
const CLARIFICATION_MARKER: &str = "Уточнение пользователя";

/// How many saved events are echoed back after a successful save.
const SAVED_ECHO_LIMIT: usize = 10;

/// Button-style actions a confirmation reply offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    ConfirmSave,
    ConfirmEdit,
}

impl ReplyAction {
    /// Stable identifier for transports with callback-data buttons.
    pub fn callback_data(self) -> &'static str {
        match self {
            ReplyAction::ConfirmSave => "confirm_save",
            ReplyAction::ConfirmEdit => "confirm_edit",
        }
    }

    pub fn label(self, locale: &str) -> String {
        match self {
            ReplyAction::ConfirmSave => rust_i18n::t!("action_save", locale = locale).to_string(),
            ReplyAction::ConfirmEdit => rust_i18n::t!("action_edit", locale = locale).to_string(),
        }
    }
}

/// What the pipeline wants said back to the chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub actions: Vec<ReplyAction>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: Vec::new(),
        }
    }
}

/// The two confirmation actions accepted from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Save,
    Edit,
}

impl ConfirmAction {
    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "confirm_save" => Some(Self::Save),
            "confirm_edit" => Some(Self::Edit),
            _ => None,
        }
    }
}

/// "Today" in the user's timezone; an unknown timezone name falls back to
/// the source corpus default rather than failing the whole message.
fn base_date(tz_name: &str) -> NaiveDate {
    let tz: Tz = tz_name.parse().unwrap_or(chrono_tz::Europe::Moscow);
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Extraction-and-confirmation pipeline for all chats. Owns its service
/// handles: the session store, the local strategy cascade, the delegated
/// agent and the persistence gateway are constructed once at startup and
/// injected here.
pub struct Planner<S, A> {
    sessions: SessionStore,
    cascade: Cascade,
    store: S,
    agent: A,
}

impl<S: EventStore, A: AgentClient> Planner<S, A> {
    pub fn new(store: S, agent: A) -> Self {
        Self {
            sessions: SessionStore::new(),
            cascade: Cascade::standard(),
            store,
            agent,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Entry point for free text (typed, transcribed, OCRed or
    /// PDF-extracted). A chat awaiting clarification treats the text as the
    /// clarification answer; otherwise it starts a fresh extraction.
    pub async fn handle_text(
        &self,
        chat: ChatId,
        text: &str,
        tz_name: &str,
        locale: &str,
    ) -> Reply {
        match self.sessions.state(chat).await {
            ChatState::AwaitingClarification(pending) => {
                self.handle_clarification_reply(chat, pending, text, locale)
                    .await
            }
            _ => self.handle_fresh_text(chat, text, tz_name, locale).await,
        }
    }

    /// Entry point for text-producer output (voice/photo/PDF). Empty or
    /// failed production is terminal and reported with the producer-specific
    /// message.
    pub async fn handle_produced_text(
        &self,
        chat: ChatId,
        kind: ProducerKind,
        produced: Result<String>,
        tz_name: &str,
        locale: &str,
    ) -> Reply {
        match produced {
            Ok(text) if !text.trim().is_empty() => {
                self.handle_text(chat, text.trim(), tz_name, locale).await
            }
            Ok(_) => Reply::text(kind.empty_reply(locale)),
            Err(e) => {
                log::warn!("text producer {:?} failed: {e}", kind);
                Reply::text(kind.empty_reply(locale))
            }
        }
    }

    /// Fresh extraction: local cascade (ticket > rules, strict dates) →
    /// sanitize → simple delegated extractor → clarify-capable delegated
    /// extractor. Exhausting every stage enters the clarification loop.
    async fn handle_fresh_text(
        &self,
        chat: ChatId,
        text: &str,
        tz_name: &str,
        locale: &str,
    ) -> Reply {
        let ctx = ExtractContext::strict(base_date(tz_name));

        let mut events = sanitize(self.cascade.run(text, &ctx), text);

        if events.is_empty()
            && let Some(answer) = self
                .agent
                .invoke(chat, &simple_extraction_prompt(text, tz_name))
                .await
        {
            events = sanitize(contract::parse_simple_payload(&answer), text);
        }

        if !events.is_empty() {
            return self
                .begin_confirmation(chat, events, text.to_string(), tz_name.to_string(), locale)
                .await;
        }

        let reply = match self.invoke_clarify_agent(chat, text, tz_name).await {
            contract::AgentReply::Events(candidates) => {
                let events = sanitize(candidates, text);
                if !events.is_empty() {
                    return self
                        .begin_confirmation(
                            chat,
                            events,
                            text.to_string(),
                            tz_name.to_string(),
                            locale,
                        )
                        .await;
                }
                rust_i18n::t!("extract_failed", locale = locale).to_string()
            }
            contract::AgentReply::Clarify(question) => question,
            contract::AgentReply::Empty => {
                rust_i18n::t!("extract_failed", locale = locale).to_string()
            }
        };

        self.sessions
            .begin_clarification(chat, PendingClarification::new(text, tz_name))
            .await;
        Reply::text(reply)
    }

    /// One clarification round: append the reply to the accumulated text and
    /// rerun the cascade (ticket → simple delegated → rules in strict mode →
    /// clarify-capable delegated) against the merged text.
    async fn handle_clarification_reply(
        &self,
        chat: ChatId,
        pending: PendingClarification,
        reply_text: &str,
        locale: &str,
    ) -> Reply {
        let merged = format!(
            "{}\n\n{}: {}",
            pending.base_text,
            CLARIFICATION_MARKER,
            reply_text.trim()
        );
        let tz_name = pending.user_timezone.clone();
        let ctx = ExtractContext::strict(base_date(&tz_name));

        let mut events = sanitize(TicketExtractor.extract(&merged, &ctx), &merged);

        if events.is_empty()
            && let Some(answer) = self
                .agent
                .invoke(chat, &simple_extraction_prompt(&merged, &tz_name))
                .await
        {
            events = sanitize(contract::parse_simple_payload(&answer), &merged);
        }

        if events.is_empty() {
            events = sanitize(RuleExtractor.extract(&merged, &ctx), &merged);
        }

        let mut question = None;
        if events.is_empty() {
            match self.invoke_clarify_agent(chat, &merged, &tz_name).await {
                contract::AgentReply::Events(candidates) => {
                    events = sanitize(candidates, &merged);
                }
                contract::AgentReply::Clarify(q) => question = Some(q),
                contract::AgentReply::Empty => {}
            }
        }

        if !events.is_empty() {
            // Resolved: the clarification record is replaced by the
            // confirmation record.
            return self
                .begin_confirmation(chat, events, merged, tz_name, locale)
                .await;
        }

        let attempts = pending.attempts + 1;
        log::debug!("clarification round {} for chat {}", attempts, chat);
        self.sessions
            .begin_clarification(
                chat,
                PendingClarification {
                    base_text: merged,
                    user_timezone: tz_name,
                    attempts,
                },
            )
            .await;

        Reply::text(question.unwrap_or_else(|| {
            rust_i18n::t!("clarify_generic", locale = locale).to_string()
        }))
    }

    /// Save or edit the pending confirmation. An action with no pending
    /// record is an explicit no-op with a "draft not found" reply.
    pub async fn handle_confirm(
        &self,
        chat: ChatId,
        action: ConfirmAction,
        locale: &str,
    ) -> Reply {
        let Some(pending) = self.sessions.confirmation(chat).await else {
            return Reply::text(rust_i18n::t!("draft_not_found", locale = locale));
        };

        match action {
            ConfirmAction::Save => self.save_confirmed(chat, pending, locale).await,
            ConfirmAction::Edit => {
                // Reuse the disambiguation loop instead of a separate
                // editing UI: seed a clarification with the source text.
                self.sessions
                    .begin_clarification(
                        chat,
                        PendingClarification::new(
                            pending.source_text.trim(),
                            pending.user_timezone,
                        ),
                    )
                    .await;
                Reply::text(rust_i18n::t!("edit_prompt", locale = locale))
            }
        }
    }

    async fn save_confirmed(
        &self,
        chat: ChatId,
        pending: PendingConfirmation,
        locale: &str,
    ) -> Reply {
        let events: Vec<ParsedEvent> = pending
            .events
            .iter()
            .cloned()
            .filter_map(EventDraft::into_event)
            .collect();
        if events.is_empty() {
            // Stored drafts did not deserialize; recoverable, the record
            // stays addressable until overwritten.
            return Reply::text(rust_i18n::t!("draft_unreadable", locale = locale));
        }

        let mut saved = Vec::new();
        for event in &events {
            let record = EventRecord::from_parsed(event, chat);
            match self
                .store
                .save_event(&record, &pending.user_timezone)
                .await
            {
                Ok(Some(_)) => saved.push(event.clone()),
                Ok(None) => log::warn!("store did not create event for chat {}", chat),
                Err(e) => log::warn!("persistence failure for chat {}: {e}", chat),
            }
        }

        if saved.is_empty() {
            // Distinct from "nothing to save": the record survives so the
            // user can retry once the backend recovers.
            return Reply::text(rust_i18n::t!("save_failed", locale = locale));
        }

        self.sessions.clear(chat).await;

        let mut lines =
            vec![rust_i18n::t!("saved_count", locale = locale, count = saved.len()).to_string()];
        lines.extend(saved_lines(&saved, SAVED_ECHO_LIMIT));
        Reply::text(lines.join("\n"))
    }

    async fn begin_confirmation(
        &self,
        chat: ChatId,
        events: Vec<ParsedEvent>,
        source_text: String,
        user_timezone: String,
        locale: &str,
    ) -> Reply {
        let drafts = events.iter().map(EventDraft::from_event).collect();
        self.sessions
            .begin_confirmation(
                chat,
                PendingConfirmation {
                    events: drafts,
                    source_text,
                    user_timezone,
                },
            )
            .await;

        let text = format!(
            "{}\n\n{}",
            rust_i18n::t!("confirm_prompt", locale = locale),
            preview_blocks(&events, locale)
        );
        Reply {
            text,
            actions: vec![ReplyAction::ConfirmSave, ReplyAction::ConfirmEdit],
        }
    }

    async fn invoke_clarify_agent(
        &self,
        chat: ChatId,
        text: &str,
        tz_name: &str,
    ) -> contract::AgentReply {
        match self
            .agent
            .invoke(chat, &clarify_extraction_prompt(text, tz_name))
            .await
        {
            Some(answer) => contract::parse_clarify_payload(&answer),
            None => contract::AgentReply::Empty,
        }
    }
}
