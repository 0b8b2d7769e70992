// Ticket/poster heuristic behavior.
use chrono::NaiveDate;
use planera::extract::{ExtractContext, Extractor, TicketExtractor};
use planera::model::Recurrence;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const POSTER: &str = "Электронный билет\nКонцерт группы Кино\n23 февраля 19:30\nклуб Космонавт\nМосква, Бухарестская 8\nряд 5 место 12";

#[test]
fn full_poster_yields_one_event_with_venue_and_address() {
    let ctx = ExtractContext::new(date(2026, 2, 1));
    let events = TicketExtractor.extract(POSTER, &ctx);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event_date, date(2026, 2, 23));
    assert_eq!(event.start_time.format("%H:%M").to_string(), "19:30");
    assert!(event.stop_time.is_none());
    assert_eq!(event.recurrence, Recurrence::Never);
    assert_eq!(event.description, "клуб Космонавт | Москва, Бухарестская 8");
}

#[test]
fn near_past_ticket_date_is_not_rolled_over() {
    // Up to 30 days in the past the printed date stands.
    let ctx = ExtractContext::new(date(2026, 3, 10));
    let events = TicketExtractor.extract(POSTER, &ctx);
    assert_eq!(events[0].event_date, date(2026, 2, 23));
}

#[test]
fn far_past_ticket_date_rolls_to_next_year() {
    let ctx = ExtractContext::new(date(2026, 12, 1));
    let events = TicketExtractor.extract(POSTER, &ctx);
    assert_eq!(events[0].event_date, date(2027, 2, 23));
}

#[test]
fn ticket_vocabulary_without_pattern_yields_nothing() {
    // This extractor never partially matches.
    let ctx = ExtractContext::new(date(2026, 2, 1));
    assert!(
        TicketExtractor
            .extract("купи билет на концерт завтра", &ctx)
            .is_empty()
    );
}

#[test]
fn pattern_without_ticket_vocabulary_yields_nothing() {
    let ctx = ExtractContext::new(date(2026, 2, 1));
    assert!(
        TicketExtractor
            .extract("встреча 23 февраля 19:30", &ctx)
            .is_empty()
    );
}

#[test]
fn poster_without_venue_keeps_generic_description() {
    let ctx = ExtractContext::new(date(2026, 2, 1));
    let events = TicketExtractor.extract("билет\n23 февраля 19:30", &ctx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description, "Мероприятие по билету");
}
