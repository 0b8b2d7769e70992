// File: ./src/extract/segment.rs
//! Splits raw text into independently parseable event-candidate chunks.
use once_cell::sync::Lazy;
use regex::Regex;

/// A bare conjunction surrounded by whitespace.
static CONJUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s(?:и|and)\s").expect("conjunction regex"));

/// A date/time cue that must immediately follow a conjunction for the split
/// to apply: a relative-day word, `next`-style modifier, a numeric date
/// start, or `<digits> <letter-word>` (month name or weekday follows).
static SPLIT_CUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:на|on|tomorrow|завтра|today|сегодня|next|следующ|\d{1,2}[./]|\d{1,2}\s+[a-zа-яё])")
        .expect("split cue regex")
});

/// Splits on newlines/semicolons into primary chunks, then splits each
/// primary chunk on "и"/"and" only when the conjunction is followed by a
/// recognizable date/time cue. A single event description that merely
/// contains "and" stays in one piece. Original order is preserved.
pub fn segment(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();

    for primary in text.split(['\n', ';']) {
        let primary = primary.trim();
        if primary.is_empty() {
            continue;
        }

        let mut start = 0;
        for conj in CONJUNCTION_RE.find_iter(primary) {
            if !SPLIT_CUE_RE.is_match(&primary[conj.end()..]) {
                continue;
            }
            let piece = primary[start..conj.start()].trim();
            if !piece.is_empty() {
                chunks.push(piece.to_string());
            }
            start = conj.end();
        }

        let tail = primary[start..].trim();
        if !tail.is_empty() {
            chunks.push(tail.to_string());
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_and_semicolons() {
        let chunks = segment("встреча завтра в 10:00\nобед 12.03 в 13:00; ужин в 19:00");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "встреча завтра в 10:00");
    }

    #[test]
    fn conjunction_without_cue_stays_joined() {
        let chunks = segment("встреча и ужин завтра в 19:00");
        assert_eq!(chunks, vec!["встреча и ужин завтра в 19:00".to_string()]);
    }

    #[test]
    fn conjunction_before_relative_day_splits() {
        let chunks = segment("встреча сегодня в 10:00 и завтра в 11:00 созвон");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "встреча сегодня в 10:00");
        assert_eq!(chunks[1], "завтра в 11:00 созвон");
    }

    #[test]
    fn conjunction_before_numeric_date_splits() {
        let chunks = segment("dentist on 12.03 at 10:00 and 14.03 at 16:00 follow-up");
        assert_eq!(chunks.len(), 2);
    }
}
