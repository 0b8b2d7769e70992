// File: ./src/model/event.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Description used when extraction yields nothing meaningful.
/// Kept in Russian to match the source corpus; the sanitizer treats the
/// English "event" as the same placeholder.
pub const PLACEHOLDER_DESCRIPTION: &str = "Событие";

/// Marker separating a description from a folded-in address.
pub const ADDRESS_SEPARATOR: &str = "| Адрес:";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
    Annual,
}

impl Recurrence {
    /// Parses the wire tag (`never|daily|weekly|monthly|annual`).
    /// The delegated agent occasionally echoes the Russian adverb instead;
    /// those are accepted too. Anything else maps to `Never`.
    pub fn parse_wire(raw: &str) -> Self {
        let low = raw.trim().to_lowercase();
        if let Ok(value) = low.parse::<Recurrence>() {
            return value;
        }
        match low.as_str() {
            "ежедневно" => Self::Daily,
            "еженедельно" => Self::Weekly,
            "ежемесячно" => Self::Monthly,
            "ежегодно" => Self::Annual,
            _ => Self::Never,
        }
    }
}

/// A candidate event produced by any extraction strategy.
///
/// Invariants: `start_time` is always present on a parsed value; `event_date`
/// is always resolved (extractors either default a missing date or drop the
/// candidate, depending on strict mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub stop_time: Option<NaiveTime>,
    pub description: String,
    pub recurrence: Recurrence,
}

impl ParsedEvent {
    /// Canonical deduplication key: (ISO date, HH:MM start, normalized description).
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.event_date.format("%Y-%m-%d").to_string(),
            self.start_time.format("%H:%M").to_string(),
            self.description.trim().to_lowercase(),
        )
    }

    /// True when the description is the generic placeholder (either language).
    pub fn has_placeholder_description(&self) -> bool {
        matches!(
            self.description.trim().to_lowercase().as_str(),
            "событие" | "event"
        )
    }
}

fn default_recurrent() -> String {
    "never".to_string()
}

/// Serialized event form: the shape stored inside a pending confirmation and
/// the row shape of the simple-mode agent contract. All fields are defaulted
/// so partially-filled agent rows deserialize; validation happens in
/// [`EventDraft::into_event`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default = "default_recurrent")]
    pub recurrent: String,
}

fn parse_draft_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

impl EventDraft {
    pub fn from_event(event: &ParsedEvent) -> Self {
        Self {
            date: event.event_date.format("%Y-%m-%d").to_string(),
            start_time: event.start_time.format("%H:%M").to_string(),
            end_time: event.stop_time.map(|t| t.format("%H:%M").to_string()),
            description: event.description.clone(),
            address: None,
            recurrent: event.recurrence.to_string(),
        }
    }

    /// Validates the draft into a [`ParsedEvent`].
    ///
    /// A bad date or start time drops the whole row; a bad end time only
    /// drops the end. An `address` field is folded into the description.
    pub fn into_event(self) -> Option<ParsedEvent> {
        let event_date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()?;
        let start_time = parse_draft_time(&self.start_time)?;
        let stop_time = self.end_time.as_deref().and_then(parse_draft_time);

        let mut description = self.description.trim().to_string();
        if description.is_empty() {
            description = PLACEHOLDER_DESCRIPTION.to_string();
        }
        if let Some(address) = self.address.as_deref().map(str::trim)
            && !address.is_empty()
        {
            description = format!("{} {} {}", description, ADDRESS_SEPARATOR, address);
        }

        Some(ParsedEvent {
            event_date,
            start_time,
            stop_time,
            description,
            recurrence: Recurrence::parse_wire(&self.recurrent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_wire_tags() {
        assert_eq!(Recurrence::parse_wire("weekly"), Recurrence::Weekly);
        assert_eq!(Recurrence::parse_wire("ANNUAL"), Recurrence::Annual);
        assert_eq!(Recurrence::parse_wire("ежемесячно"), Recurrence::Monthly);
        assert_eq!(Recurrence::parse_wire("whenever"), Recurrence::Never);
    }

    #[test]
    fn draft_address_folding() {
        let draft = EventDraft {
            date: "2026-03-08".into(),
            start_time: "15:00".into(),
            end_time: None,
            description: "Концерт".into(),
            address: Some("Москва, Тверская 1".into()),
            recurrent: "never".into(),
        };
        let event = draft.into_event().unwrap();
        assert_eq!(event.description, "Концерт | Адрес: Москва, Тверская 1");
    }

    #[test]
    fn draft_invalid_start_drops_row() {
        let draft = EventDraft {
            date: "2026-03-08".into(),
            start_time: "25:99".into(),
            end_time: None,
            description: "x".into(),
            address: None,
            recurrent: "never".into(),
        };
        assert!(draft.into_event().is_none());
    }

    #[test]
    fn draft_invalid_end_only_drops_end() {
        let draft = EventDraft {
            date: "2026-03-08".into(),
            start_time: "10:00".into(),
            end_time: Some("later".into()),
            description: "x".into(),
            address: None,
            recurrent: "never".into(),
        };
        let event = draft.into_event().unwrap();
        assert!(event.stop_time.is_none());
    }
}
