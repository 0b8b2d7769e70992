// File: ./src/extract/lexicon.rs
//! Keyword dictionaries shared by the extraction strategies.
//!
//! Month tables are prefix tables: entries are matched with `starts_with`
//! against a lowercased word, so `январ` covers both `январь` and `января`.
//! Order matters — `март` must precede the bare `ма` (May) prefix.

/// Russian month-name prefixes, in lookup order.
pub const RU_MONTHS: &[(&str, u32)] = &[
    ("январ", 1),
    ("феврал", 2),
    ("март", 3),
    ("апрел", 4),
    ("ма", 5),
    ("июн", 6),
    ("июл", 7),
    ("август", 8),
    ("сентябр", 9),
    ("октябр", 10),
    ("ноябр", 11),
    ("декабр", 12),
];

/// English month-name prefixes, in lookup order (`sept` before `sep` is not
/// needed: both map to 9).
pub const EN_MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("sept", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Weekday substrings mapped to days-from-Monday. Russian entries are stem
/// prefixes so declined forms match (`среду`, `пятницу`, `воскресенье`).
pub const WEEKDAYS_RU: &[(&str, u32)] = &[
    ("понедельник", 0),
    ("вторник", 1),
    ("сред", 2),
    ("четверг", 3),
    ("пятниц", 4),
    ("суббот", 5),
    ("воскрес", 6),
];

pub const WEEKDAYS_EN: &[(&str, u32)] = &[
    ("monday", 0),
    ("tuesday", 1),
    ("wednesday", 2),
    ("thursday", 3),
    ("friday", 4),
    ("saturday", 5),
    ("sunday", 6),
];

// Recurrence marker sets, most specific checked first by the extractor.
pub const ANNUAL_MARKERS: &[&str] = &[
    "ежегод",
    "ежегодно",
    "каждый год",
    "раз в год",
    "годовщин",
    "annual",
    "yearly",
    "every year",
    "once a year",
];

pub const MONTHLY_MARKERS: &[&str] = &[
    "ежемесяч",
    "ежемесячно",
    "каждый месяц",
    "раз в месяц",
    "monthly",
    "every month",
    "once a month",
];

pub const WEEKLY_MARKERS: &[&str] = &[
    "еженед",
    "еженедельно",
    "каждую неделю",
    "каждой неделе",
    "раз в неделю",
    "weekly",
    "every week",
    "once a week",
];

pub const DAILY_MARKERS: &[&str] = &[
    "ежеднев",
    "ежедневно",
    "каждый день",
    "каждыйдень",
    "раз в день",
    "daily",
    "every day",
    "once a day",
];

/// Markers that introduce an explicit topic; the description becomes
/// everything after the marker. `о ` keeps its trailing space so the bare
/// preposition does not match inside words.
pub const TOPIC_MARKERS: &[&str] = &[
    "по поводу",
    "насчет",
    "на тему",
    "about",
    "regarding",
    "on the topic of",
    "о ",
];

/// Vocabulary gating the ticket/poster heuristic.
pub const TICKET_MARKERS: &[&str] = &[
    "билет", "партер", "ряд", "место", "клуб", "ticket", "seat", "row",
];

/// Lines containing these never become a fallback title.
pub const TITLE_STOPWORDS: &[&str] = &[
    "январ",
    "феврал",
    "март",
    "апрел",
    "мая",
    "июн",
    "июл",
    "август",
    "сентябр",
    "октябр",
    "ноябр",
    "декабр",
    "today",
    "tomorrow",
    "вход",
    "билет",
    "место",
    "ряд",
    "дата",
    "время",
    "адрес",
    "дворец культуры",
];

/// Finds a month by prefix in a lookup-ordered table.
pub fn month_by_prefix(table: &[(&str, u32)], word: &str) -> Option<u32> {
    table
        .iter()
        .find(|(prefix, _)| word.starts_with(prefix))
        .map(|(_, month)| *month)
}

/// True when any of `markers` occurs as a substring of `low`.
pub fn contains_any(low: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| low.contains(m))
}
