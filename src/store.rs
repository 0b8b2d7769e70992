// File: src/store.rs
//! Persistence gateway interface and the in-memory reference implementation.
use crate::model::{ParsedEvent, Recurrence};
use crate::session::ChatId;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type EventId = String;

/// A fully-populated event record handed to the persistence gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub stop_time: Option<NaiveTime>,
    pub description: String,
    pub recurrence: Recurrence,
    pub chat_id: ChatId,
}

impl EventRecord {
    pub fn from_parsed(event: &ParsedEvent, chat_id: ChatId) -> Self {
        Self {
            event_date: event.event_date,
            start_time: event.start_time,
            stop_time: event.stop_time,
            description: event.description.clone(),
            recurrence: event.recurrence,
            chat_id,
        }
    }
}

/// External persistence gateway. Returns the generated identifier on
/// success; `Ok(None)` means the backend did not create the record, which
/// callers treat as "not created", not as an exception.
pub trait EventStore {
    fn save_event(
        &self,
        record: &EventRecord,
        tz_name: &str,
    ) -> impl std::future::Future<Output = Result<Option<EventId>>> + Send;
}

/// In-memory [`EventStore`] used by tests and the console surface.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Arc<Mutex<Vec<(EventId, EventRecord)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far, in save order.
    pub async fn saved(&self) -> Vec<EventRecord> {
        self.events
            .lock()
            .await
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

impl EventStore for MemoryStore {
    async fn save_event(&self, record: &EventRecord, _tz_name: &str) -> Result<Option<EventId>> {
        let id = Uuid::new_v4().to_string();
        self.events.lock().await.push((id.clone(), record.clone()));
        Ok(Some(id))
    }
}
