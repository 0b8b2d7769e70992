// File: ./src/extract/sanitize.rs
//! Filters garbage candidates and collapses duplicates by canonical key.
use crate::extract::lexicon::{self, TITLE_STOPWORDS};
use crate::model::ParsedEvent;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TIME_LIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[:.]\d{2}\b").expect("time-like regex"));

static DATE_LIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}[./]\d{1,2}(?:[./]\d{2,4})?\b").expect("date-like regex")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

const TITLE_MIN_CHARS: usize = 8;
const TITLE_MAX_CHARS: usize = 160;
const LINE_TRIM_CHARS: &[char] = &[' ', '-', '—', '|', '\t'];

/// Derives a better-quality title from the raw source text: the longest
/// "sentence-like" line that carries no date/time substrings and is not on
/// the stop-word list. Poster headlines tend to be exactly that line.
pub fn best_title(text: &str) -> Option<String> {
    let mut best: Option<(usize, String)> = None;

    for line in text.lines() {
        let line = WHITESPACE_RE.replace_all(line, " ");
        let line = line.trim_matches(LINE_TRIM_CHARS);
        if line.is_empty() {
            continue;
        }

        let low = line.to_lowercase();
        if TIME_LIKE_RE.is_match(&low) || DATE_LIKE_RE.is_match(&low) {
            continue;
        }
        if lexicon::contains_any(&low, TITLE_STOPWORDS) {
            continue;
        }

        let len = line.chars().count();
        if len < TITLE_MIN_CHARS {
            continue;
        }
        // Strictly greater keeps the first line on ties.
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, line.to_string()));
        }
    }

    best.map(|(_, title)| title.chars().take(TITLE_MAX_CHARS).collect())
}

/// Drops candidates with empty or purely numeric descriptions (a common
/// artifact of a stray date matched as description), substitutes the
/// fallback title for bare placeholders, then deduplicates by canonical key.
/// Later candidates overwrite earlier ones with the same key; the result
/// keeps the insertion order of each key's first occurrence. Running the
/// pass on its own output is a no-op.
pub fn sanitize(candidates: Vec<ParsedEvent>, source_text: &str) -> Vec<ParsedEvent> {
    let fallback_title = best_title(source_text);

    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut by_key: HashMap<(String, String, String), ParsedEvent> = HashMap::new();

    for mut event in candidates {
        let description = event.description.trim();
        if description.is_empty()
            || event.description.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }

        if event.has_placeholder_description()
            && let Some(title) = &fallback_title
        {
            event.description = title.clone();
        }

        let key = event.dedup_key();
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.insert(key, event);
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}
