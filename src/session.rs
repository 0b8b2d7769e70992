// File: src/session.rs
//! Per-chat conversational state.
//!
//! One chat owns at most one in-flight pipeline instance, and at most one of
//! {clarification, confirmation} is pending at a time — beginning either kind
//! replaces whatever state the chat had.
use crate::model::EventDraft;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub type ChatId = i64;

/// Multi-turn disambiguation state: the accumulated source text plus every
/// user clarification appended so far.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingClarification {
    pub base_text: String,
    pub user_timezone: String,
    /// Clarification rounds initiated so far. Starts at 1 when the first
    /// question is asked; increments on each round that still fails.
    pub attempts: u32,
}

impl PendingClarification {
    pub fn new(base_text: impl Into<String>, user_timezone: impl Into<String>) -> Self {
        Self {
            base_text: base_text.into(),
            user_timezone: user_timezone.into(),
            attempts: 1,
        }
    }
}

/// Candidate events awaiting the user's save/edit decision. The source text
/// is kept for the "edit" round-trip back into clarification.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub events: Vec<EventDraft>,
    pub source_text: String,
    pub user_timezone: String,
}

/// Tagged per-chat conversation state with explicit transitions, replacing
/// untyped key-presence checks on a session dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingClarification(PendingClarification),
    AwaitingConfirmation(PendingConfirmation),
}

/// Conversation state for all chats, keyed by chat id. No state is shared
/// across chats.
#[derive(Default)]
pub struct SessionStore {
    chats: Mutex<HashMap<ChatId, ChatState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the chat's current state.
    pub async fn state(&self, chat: ChatId) -> ChatState {
        self.chats
            .lock()
            .await
            .get(&chat)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn begin_clarification(&self, chat: ChatId, pending: PendingClarification) {
        self.chats
            .lock()
            .await
            .insert(chat, ChatState::AwaitingClarification(pending));
    }

    pub async fn begin_confirmation(&self, chat: ChatId, pending: PendingConfirmation) {
        self.chats
            .lock()
            .await
            .insert(chat, ChatState::AwaitingConfirmation(pending));
    }

    /// Destroys whatever pending record the chat holds.
    pub async fn clear(&self, chat: ChatId) {
        self.chats.lock().await.remove(&chat);
    }

    /// Returns the pending clarification, if the chat is in that state.
    pub async fn clarification(&self, chat: ChatId) -> Option<PendingClarification> {
        match self.state(chat).await {
            ChatState::AwaitingClarification(pending) => Some(pending),
            _ => None,
        }
    }

    /// Returns the pending confirmation, if the chat is in that state.
    pub async fn confirmation(&self, chat: ChatId) -> Option<PendingConfirmation> {
        match self.state(chat).await {
            ChatState::AwaitingConfirmation(pending) => Some(pending),
            _ => None,
        }
    }
}
