// File: ./src/extract/ticket.rs
//! Specialized detector for ticket/poster-style text. Produces at most one
//! event and never partially matches.
use crate::extract::lexicon::{self, RU_MONTHS, TICKET_MARKERS};
use crate::extract::{ExtractContext, Extractor};
use crate::model::{ParsedEvent, Recurrence};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Tickets printed for a recent date are left alone instead of being rolled
/// to next year.
const NEAR_PAST_DAYS: i64 = 30;

/// `<day> <RU month genitive> <HH:MM>` as printed on tickets and posters.
static TICKET_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(\d{1,2})\s+(январ[яь]|феврал[яь]|март[а]?|апрел[яь]|мая|июн[яь]|июл[яь]|август[а]?|сентябр[яь]|октябр[яь]|ноябр[яь]|декабр[яь])\s+([01]?\d|2[0-3])[:.]([0-5]\d)\b",
    )
    .expect("ticket date regex")
});

static VENUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(клуб[^;\n]+)").expect("venue regex"));

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(москва[^\n]+)").expect("address regex"));

const TICKET_PLACEHOLDER: &str = "Мероприятие по билету";

pub struct TicketExtractor;

impl Extractor for TicketExtractor {
    fn label(&self) -> &'static str {
        "ticket"
    }

    fn extract(&self, text: &str, ctx: &ExtractContext) -> Vec<ParsedEvent> {
        let low = text.to_lowercase();
        if !lexicon::contains_any(&low, TICKET_MARKERS) {
            return Vec::new();
        }

        let Some(caps) = TICKET_DATE_RE.captures(&low) else {
            return Vec::new();
        };
        let Ok(day) = caps[1].parse::<u32>() else {
            return Vec::new();
        };
        let Some(month) = lexicon::month_by_prefix(RU_MONTHS, &caps[2]) else {
            return Vec::new();
        };
        let Some(start_time) = caps[3]
            .parse::<u32>()
            .ok()
            .zip(caps[4].parse::<u32>().ok())
            .and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
        else {
            return Vec::new();
        };

        let base = ctx.base_date;
        let Some(mut event_date) = NaiveDate::from_ymd_opt(base.year(), month, day) else {
            return Vec::new();
        };
        // Allow near-past tickets to stand to avoid a wrong year rollover.
        if event_date < base - Duration::days(NEAR_PAST_DAYS) {
            match NaiveDate::from_ymd_opt(base.year() + 1, month, day) {
                Some(next_year) => event_date = next_year,
                None => return Vec::new(),
            }
        }

        let venue = VENUE_RE
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .filter(|v| !v.is_empty());
        let address = ADDRESS_RE
            .captures(text)
            .map(|c| c[1].trim().to_string())
            .filter(|a| !a.is_empty());

        let mut description = venue.unwrap_or_else(|| TICKET_PLACEHOLDER.to_string());
        if let Some(address) = address {
            description = format!("{} | {}", description, address);
        }

        vec![ParsedEvent {
            event_date,
            start_time,
            stop_time: None,
            description,
            recurrence: Recurrence::Never,
        }]
    }
}
