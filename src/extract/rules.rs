// File: ./src/extract/rules.rs
//! Deterministic rule-based extraction: per-chunk date, time-or-range,
//! recurrence tag and description.
use crate::extract::lexicon::{
    self, ANNUAL_MARKERS, DAILY_MARKERS, EN_MONTHS, MONTHLY_MARKERS, RU_MONTHS, TOPIC_MARKERS,
    WEEKDAYS_EN, WEEKDAYS_RU, WEEKLY_MARKERS,
};
use crate::extract::segment::segment;
use crate::extract::{ExtractContext, Extractor};
use crate::model::event::PLACEHOLDER_DESCRIPTION;
use crate::model::{ParsedEvent, Recurrence};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

// --- DATE PATTERNS ---

/// `23 февраля [2026]` — day, Cyrillic word, optional 4-digit year.
static RU_MONTH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})\s+([а-яё]+)(?:\s+(\d{4}))?\b").expect("ru month regex"));

/// `Feb 23[, 2026]`.
static EN_MONTH_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([a-z]{3,9})\s+(\d{1,2})(?:,?\s*(\d{4}))?\b").expect("en month regex"));

/// `23 Feb[, 2026]`.
static EN_DAY_FIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})\s+([a-z]{3,9})(?:,?\s*(\d{4}))?\b").expect("en day regex"));

/// `dd.mm[.yy[yy]]` or `dd/mm[/yy[yy]]`.
static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[./](\d{1,2})(?:[./](\d{2,4}))?\b").expect("numeric date regex")
});

// --- TIME PATTERNS ---

/// `11:00-12:30` with `-`, `–` or `—`; `.` also accepted as the hour/minute
/// separator as printed on posters (`19.30`).
static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([01]?\d|2[0-3])[:.]([0-5]\d)\s*[-–—]\s*([01]?\d|2[0-3])[:.]([0-5]\d)")
        .expect("time range regex")
});

/// `с 11:00 до 12:30` / `from 11:00 to 12:30`.
static FROM_TO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:с|from)\s*([01]?\d|2[0-3])[:.]([0-5]\d)\s*(?:до|to|till|until)\s*([01]?\d|2[0-3])[:.]([0-5]\d)",
    )
    .expect("from-to regex")
});

/// A single `HH:MM`, optionally prefixed by `в`/`at`.
static SINGLE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bв\s*|\bat\s*)?([01]?\d|2[0-3])[:.]([0-5]\d)\b").expect("single time regex")
});

/// A bare hour: `в 11` / `at 11`, minutes default to zero.
static BARE_HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\bв\s*|\bat\s*)([01]?\d|2[0-3])\b").expect("bare hour regex"));

// --- DESCRIPTION STRIP PATTERNS ---

static ACTION_VERBS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(создай|создать|добавь|добавить|запланируй|поставь|create|add|schedule|set)\b")
        .expect("action verbs regex")
});

static RECURRENCE_PHRASES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(ежегодн\w*|ежемесячн\w*|еженедельн\w*|ежедневн\w*|каждый\s+год|каждый\s+месяц|каждую\s+неделю|каждый\s+день|annual|yearly|monthly|weekly|daily|every\s+year|every\s+month|every\s+week|every\s+day)\b",
    )
    .expect("recurrence phrases regex")
});

static RELATIVE_DAYS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(сегодня|завтра|послезавтра|today|tomorrow|day after tomorrow|next)\b")
        .expect("relative days regex")
});

static TIME_MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\bв\s*|\bat\s*)?([01]?\d|2[0-3])[:.]([0-5]\d)\b").expect("time strip regex")
});

static FILLER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(on|in)\b").expect("filler regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const TRIM_CHARS: &[char] = &[' ', '.', ',', '!', '?', ':', ';', '-'];

fn month_date(
    day: u32,
    month: u32,
    explicit_year: Option<i32>,
    base: NaiveDate,
) -> Option<NaiveDate> {
    let year = explicit_year.unwrap_or(base.year());
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // A yearless date in the past rolls forward one year (the New-Year
    // boundary case).
    if explicit_year.is_none() && date < base {
        return NaiveDate::from_ymd_opt(year + 1, month, day);
    }
    Some(date)
}

/// Extracts a calendar date from a chunk, trying in order: relative-day
/// keywords, weekday names, month-word dates (RU then EN, both word orders),
/// then purely numeric dates. Returns None if nothing matches.
pub fn extract_date(chunk: &str, base: NaiveDate) -> Option<NaiveDate> {
    let low = chunk.to_lowercase();

    // Relative days, most specific first so "завтра" does not match inside
    // "послезавтра".
    if low.contains("послезавтра") || low.contains("day after tomorrow") {
        return Some(base + Duration::days(2));
    }
    if low.contains("завтра") || low.contains("tomorrow") {
        return Some(base + Duration::days(1));
    }
    if low.contains("сегодня") || low.contains("today") {
        return Some(base);
    }

    // Weekday names: next occurrence strictly after today when the name
    // matches today's weekday.
    for (word, target) in WEEKDAYS_RU.iter().chain(WEEKDAYS_EN.iter()) {
        if low.contains(word) {
            let mut delta =
                (*target as i64 - base.weekday().num_days_from_monday() as i64).rem_euclid(7);
            if delta == 0 {
                delta = 7;
            }
            return Some(base + Duration::days(delta));
        }
    }

    // Russian month words: "23 февраля [2026]".
    if let Some(caps) = RU_MONTH_DATE_RE.captures(&low) {
        let day: u32 = caps[1].parse().ok()?;
        let year = caps.get(3).and_then(|y| y.as_str().parse::<i32>().ok());
        if let Some(month) = lexicon::month_by_prefix(RU_MONTHS, &caps[2])
            && let Some(date) = month_date(day, month, year, base)
        {
            return Some(date);
        }
    }

    // English month words: "Feb 23 [2026]" / "23 Feb [2026]".
    for (re, month_idx, day_idx) in [(&EN_MONTH_FIRST_RE, 1, 2), (&EN_DAY_FIRST_RE, 2, 1)] {
        if let Some(caps) = re.captures(&low) {
            let year = caps.get(3).and_then(|y| y.as_str().parse::<i32>().ok());
            if let Some(month) = lexicon::month_by_prefix(EN_MONTHS, &caps[month_idx])
                && let Ok(day) = caps[day_idx].parse::<u32>()
                && let Some(date) = month_date(day, month, year, base)
            {
                return Some(date);
            }
        }
    }

    // Numeric dates: dd.mm(.yyyy) or dd/mm(/yyyy), two-digit years add 2000.
    let caps = NUMERIC_DATE_RE.captures(chunk)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = caps.get(3).map(|y| y.as_str()).and_then(|raw| {
        let parsed: i32 = raw.parse().ok()?;
        Some(if raw.len() == 2 { parsed + 2000 } else { parsed })
    });
    month_date(day, month, year, base)
}

fn time_from(h: &str, m: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)
}

/// Byte spans of substrings that read as plausible calendar dates
/// (`12.03`, `01/02/2026`). Used to keep a dotted date from being taken for
/// a dotted time: `12.03` is a date, `19.30` is a poster-style time.
fn plausible_date_spans(low: &str) -> Vec<(usize, usize)> {
    NUMERIC_DATE_RE
        .captures_iter(low)
        .filter_map(|caps| {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            // Leap-year probe: accepts 29.02.
            NaiveDate::from_ymd_opt(2000, month, day)?;
            let whole = caps.get(0)?;
            Some((whole.start(), whole.end()))
        })
        .collect()
}

/// Extracts a start time and optional stop time, trying: an explicit range,
/// a "from X to Y" range, a single HH:MM, then a bare "at H" hour.
pub fn extract_time_range(chunk: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let low = chunk.to_lowercase();

    if let Some(caps) = TIME_RANGE_RE.captures(&low)
        && let (Some(start), Some(stop)) = (time_from(&caps[1], &caps[2]), time_from(&caps[3], &caps[4]))
    {
        return (Some(start), Some(stop));
    }

    if let Some(caps) = FROM_TO_RE.captures(&low)
        && let (Some(start), Some(stop)) = (time_from(&caps[1], &caps[2]), time_from(&caps[3], &caps[4]))
    {
        return (Some(start), Some(stop));
    }

    let date_spans = plausible_date_spans(&low);
    for caps in SINGLE_TIME_RE.captures_iter(&low) {
        let Some(whole) = caps.get(0) else { continue };
        let overlaps_date = date_spans
            .iter()
            .any(|&(start, end)| whole.start() < end && start < whole.end());
        if !overlaps_date {
            return (time_from(&caps[1], &caps[2]), None);
        }
    }

    for caps in BARE_HOUR_RE.captures_iter(&low) {
        let Some(whole) = caps.get(0) else { continue };
        let overlaps_date = date_spans
            .iter()
            .any(|&(start, end)| whole.start() < end && start < whole.end());
        if !overlaps_date {
            return (time_from(&caps[1], "0"), None);
        }
    }

    (None, None)
}

/// Keyword-set recurrence lookup, most specific first, plus the composite
/// "every <weekday>" rule.
pub fn extract_recurrence(chunk: &str) -> Recurrence {
    let low = chunk.to_lowercase();

    if lexicon::contains_any(&low, ANNUAL_MARKERS) {
        return Recurrence::Annual;
    }
    if lexicon::contains_any(&low, MONTHLY_MARKERS) {
        return Recurrence::Monthly;
    }
    if lexicon::contains_any(&low, WEEKLY_MARKERS) {
        return Recurrence::Weekly;
    }
    if lexicon::contains_any(&low, DAILY_MARKERS) {
        return Recurrence::Daily;
    }

    // "каждый понедельник" / "every monday" => weekly
    let ru_weekday = WEEKDAYS_RU.iter().any(|(w, _)| low.contains(w));
    let en_weekday = WEEKDAYS_EN.iter().any(|(w, _)| low.contains(w));
    if (low.contains("каждый") && ru_weekday) || (low.contains("every") && en_weekday) {
        return Recurrence::Weekly;
    }

    Recurrence::Never
}

/// Derives the description: the text after an explicit topic marker when one
/// is present; otherwise the chunk with action verbs, recurrence phrases,
/// relative-day words and the matched time/date substrings stripped out.
/// An empty result becomes the generic placeholder.
pub fn extract_description(chunk: &str) -> String {
    let text = WHITESPACE_RE.replace_all(chunk, " ").trim().to_string();
    let low = text.to_lowercase();

    for marker in TOPIC_MARKERS {
        if let Some(pos) = low.find(marker) {
            // Byte offsets in `low` line up with `text` for the RU/EN corpus;
            // fall through on the rare mismatch instead of slicing blindly.
            if let Some(value) = text.get(pos + marker.len()..) {
                let value = value.trim_matches(TRIM_CHARS);
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
    }

    let text = ACTION_VERBS_RE.replace_all(&text, "");
    let text = RECURRENCE_PHRASES_RE.replace_all(&text, "");
    let text = RELATIVE_DAYS_RE.replace_all(&text, "");
    let text = TIME_MENTION_RE.replace_all(&text, "");
    let text = NUMERIC_DATE_RE.replace_all(&text, "");
    let text = FILLER_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = text.trim_matches(TRIM_CHARS);

    if text.is_empty() {
        PLACEHOLDER_DESCRIPTION.to_string()
    } else {
        text.to_string()
    }
}

/// Regex/dictionary-driven parser turning chunks into event candidates.
///
/// A chunk without a start time is always discarded. A chunk with a time but
/// no explicit date defaults to "tomorrow" unless strict-date mode is on, in
/// which case the chunk is dropped instead (used when re-deriving candidates
/// during disambiguation to avoid manufacturing false positives).
pub struct RuleExtractor;

impl RuleExtractor {
    fn extract_chunk(chunk: &str, ctx: &ExtractContext) -> Option<ParsedEvent> {
        let (start_time, stop_time) = extract_time_range(chunk);
        let start_time = start_time?;

        let event_date = match extract_date(chunk, ctx.base_date) {
            Some(date) => date,
            None if ctx.strict_dates => return None,
            None => ctx.base_date + Duration::days(1),
        };

        Some(ParsedEvent {
            event_date,
            start_time,
            stop_time,
            description: extract_description(chunk),
            recurrence: extract_recurrence(chunk),
        })
    }
}

impl Extractor for RuleExtractor {
    fn label(&self) -> &'static str {
        "rules"
    }

    fn extract(&self, text: &str, ctx: &ExtractContext) -> Vec<ParsedEvent> {
        segment(text)
            .iter()
            .filter_map(|chunk| Self::extract_chunk(chunk, ctx))
            .collect()
    }
}
