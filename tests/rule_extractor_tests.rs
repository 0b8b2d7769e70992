// Facet-level tests for the rule-based extractor.
use chrono::NaiveDate;
use planera::extract::rules::{
    extract_date, extract_description, extract_recurrence, extract_time_range,
};
use planera::extract::{ExtractContext, Extractor, RuleExtractor};
use planera::model::Recurrence;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn numeric_date_and_colon_time_recovered_exactly() {
    // A chunk with both a valid dd.mm and a valid HH:MM must yield exactly
    // that date and that time.
    let base = date(2026, 3, 1);
    let chunk = "обед 12.03 в 13:00";

    assert_eq!(extract_date(chunk, base), Some(date(2026, 3, 12)));
    let (start, stop) = extract_time_range(chunk);
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "13:00");
    assert!(stop.is_none());
}

#[test]
fn yearless_past_date_rolls_forward_one_year() {
    // "23.02" parsed on 01.03 resolves to next year's Feb 23.
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("поздравить 23.02 в 10:00", base),
        Some(date(2027, 2, 23))
    );
}

#[test]
fn explicit_year_in_the_past_is_kept() {
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("встреча 23.02.2025 в 10:00", base),
        Some(date(2025, 2, 23))
    );
}

#[test]
fn two_digit_year_adds_2000() {
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("сдача 01/06/27 в 09:00", base),
        Some(date(2027, 6, 1))
    );
}

#[test]
fn weekday_on_same_weekday_advances_a_full_week() {
    // 2026-01-05 is a Monday; "on Monday" parsed on a Monday resolves to
    // the following Monday, not the same day.
    let monday = date(2026, 1, 5);
    assert_eq!(
        extract_date("meeting on monday at 10:00", monday),
        Some(date(2026, 1, 12))
    );
    assert_eq!(
        extract_date("встреча в понедельник в 10:00", monday),
        Some(date(2026, 1, 12))
    );
}

#[test]
fn weekday_resolves_to_next_occurrence() {
    let monday = date(2026, 1, 5);
    assert_eq!(
        extract_date("ужин в пятницу в 19:00", monday),
        Some(date(2026, 1, 9))
    );
}

#[test]
fn relative_days_most_specific_first() {
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("послезавтра в 10:00", base),
        Some(date(2026, 3, 3))
    );
    assert_eq!(extract_date("завтра в 10:00", base), Some(date(2026, 3, 2)));
    assert_eq!(extract_date("сегодня в 10:00", base), Some(date(2026, 3, 1)));
    assert_eq!(
        extract_date("day after tomorrow at 10:00", base),
        Some(date(2026, 3, 3))
    );
}

#[test]
fn russian_month_word_dates() {
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("концерт 8 марта в 19:00", base),
        Some(date(2026, 3, 8))
    );
    // May has a bare "ма" prefix that must not shadow March.
    assert_eq!(
        extract_date("поход 9 мая в 12:00", base),
        Some(date(2026, 5, 9))
    );
    assert_eq!(
        extract_date("созвон 1 января 2027 в 10:00", base),
        Some(date(2027, 1, 1))
    );
}

#[test]
fn english_month_word_dates_both_orders() {
    let base = date(2026, 3, 1);
    assert_eq!(
        extract_date("demo feb 23 2027 at 10:00", base),
        Some(date(2027, 2, 23))
    );
    assert_eq!(
        extract_date("demo 23 feb 2027 at 10:00", base),
        Some(date(2027, 2, 23))
    );
}

#[test]
fn time_range_with_dashes() {
    let (start, stop) = extract_time_range("планерка 11:00-12:30");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "11:00");
    assert_eq!(stop.unwrap().format("%H:%M").to_string(), "12:30");

    let (start, stop) = extract_time_range("планерка 11.00 — 12.30");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "11:00");
    assert_eq!(stop.unwrap().format("%H:%M").to_string(), "12:30");
}

#[test]
fn time_range_from_to_words() {
    let (start, stop) = extract_time_range("встреча с 11:00 до 12:30");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "11:00");
    assert_eq!(stop.unwrap().format("%H:%M").to_string(), "12:30");

    let (start, stop) = extract_time_range("call from 09:00 to 10:15");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "09:00");
    assert_eq!(stop.unwrap().format("%H:%M").to_string(), "10:15");
}

#[test]
fn bare_hour_defaults_minutes_to_zero() {
    let (start, stop) = extract_time_range("встреча в 11");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "11:00");
    assert!(stop.is_none());

    let (start, _) = extract_time_range("meeting at 9");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "09:00");
}

#[test]
fn dotted_time_without_date_reading_is_accepted() {
    // 19.30 cannot be a dd.mm date (month 30), so it reads as a time.
    let (start, _) = extract_time_range("концерт 19.30");
    assert_eq!(start.unwrap().format("%H:%M").to_string(), "19:30");
}

#[test]
fn dotted_date_is_not_taken_for_a_time() {
    // 12.03 is a plausible date, so it must not be consumed as 12:03.
    let (start, _) = extract_time_range("обед 12.03");
    assert!(start.is_none());
}

#[test]
fn recurrence_markers_most_specific_first() {
    assert_eq!(
        extract_recurrence("ежегодно поздравление"),
        Recurrence::Annual
    );
    assert_eq!(extract_recurrence("раз в месяц отчет"), Recurrence::Monthly);
    assert_eq!(extract_recurrence("weekly sync"), Recurrence::Weekly);
    assert_eq!(extract_recurrence("каждый день зарядка"), Recurrence::Daily);
    assert_eq!(extract_recurrence("обычная встреча"), Recurrence::Never);
}

#[test]
fn every_weekday_implies_weekly() {
    assert_eq!(
        extract_recurrence("каждый понедельник планерка"),
        Recurrence::Weekly
    );
    assert_eq!(extract_recurrence("every friday demo"), Recurrence::Weekly);
}

#[test]
fn description_topic_marker_wins() {
    assert_eq!(
        extract_description("создай встречу завтра в 15:00 по поводу отчета"),
        "отчета"
    );
}

#[test]
fn description_strips_matched_facets() {
    let desc = extract_description("создай встречу завтра в 15:00 с коллегой");
    assert!(desc.contains("коллегой"));
    assert!(!desc.contains("завтра"));
    assert!(!desc.contains("15:00"));
    assert!(!desc.to_lowercase().contains("создай"));
}

#[test]
fn empty_description_becomes_placeholder() {
    assert_eq!(extract_description("завтра в 15:00"), "Событие");
}

#[test]
fn chunk_without_time_yields_nothing() {
    let ctx = ExtractContext::new(date(2026, 3, 1));
    assert!(RuleExtractor.extract("встреча 23.02", &ctx).is_empty());
}

#[test]
fn missing_date_defaults_to_tomorrow_unless_strict() {
    let base = date(2026, 3, 1);

    let permissive = ExtractContext::new(base);
    let events = RuleExtractor.extract("встреча в 15:00", &permissive);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_date, date(2026, 3, 2));

    let strict = ExtractContext::strict(base);
    assert!(RuleExtractor.extract("встреча в 15:00", &strict).is_empty());
}

#[test]
fn multiple_chunks_keep_input_order() {
    let ctx = ExtractContext::new(date(2026, 3, 1));
    let events = RuleExtractor.extract(
        "встреча завтра в 10:00\nобед 12.03 в 13:00",
        &ctx,
    );
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_date, date(2026, 3, 2));
    assert_eq!(events[1].event_date, date(2026, 3, 12));
}
