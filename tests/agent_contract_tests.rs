// Defensive parsing of delegated-extractor output.
use planera::agent::contract::{AgentReply, parse_clarify_payload, parse_simple_payload};
use planera::model::Recurrence;

const ROW: &str = r#"{"date": "2026-03-08", "start_time": "15:00", "end_time": "16:00", "description": "Концерт", "recurrent": "never"}"#;

#[test]
fn simple_bare_array_parses() {
    let events = parse_simple_payload(&format!("[{ROW}]"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description, "Концерт");
    assert_eq!(events[0].start_time.format("%H:%M").to_string(), "15:00");
    assert_eq!(
        events[0].stop_time.unwrap().format("%H:%M").to_string(),
        "16:00"
    );
}

#[test]
fn simple_fenced_array_parses() {
    let raw = format!("Вот события:\n```json\n[{ROW}]\n```\nГотово.");
    assert_eq!(parse_simple_payload(&raw).len(), 1);
}

#[test]
fn simple_array_inside_prose_parses() {
    let raw = format!("Нашел одно событие: [{ROW}] — обращайся!");
    assert_eq!(parse_simple_payload(&raw).len(), 1);
}

#[test]
fn simple_invalid_rows_are_dropped() {
    let raw = format!(
        r#"[{{"date": "не дата", "start_time": "15:00"}}, {{"date": "2026-03-08", "start_time": "99:00"}}, {ROW}]"#
    );
    let events = parse_simple_payload(&raw);
    assert_eq!(events.len(), 1);
}

#[test]
fn simple_invalid_end_time_only_drops_end() {
    let raw = r#"[{"date": "2026-03-08", "start_time": "15:00", "end_time": "потом", "description": "x"}]"#;
    let events = parse_simple_payload(raw);
    assert_eq!(events.len(), 1);
    assert!(events[0].stop_time.is_none());
}

#[test]
fn simple_address_folds_into_description() {
    let raw = r#"[{"date": "2026-03-08", "start_time": "15:00", "description": "Концерт", "address": "Москва, Тверская 1"}]"#;
    let events = parse_simple_payload(raw);
    assert_eq!(events[0].description, "Концерт | Адрес: Москва, Тверская 1");
}

#[test]
fn simple_russian_recurrent_tag_accepted() {
    let raw = r#"[{"date": "2026-01-01", "start_time": "10:00", "description": "x", "recurrent": "ежегодно"}]"#;
    assert_eq!(parse_simple_payload(raw)[0].recurrence, Recurrence::Annual);
}

#[test]
fn simple_garbage_yields_nothing() {
    assert!(parse_simple_payload("").is_empty());
    assert!(parse_simple_payload("ничего не нашёл").is_empty());
    assert!(parse_simple_payload("[not json").is_empty());
}

#[test]
fn clarify_ok_status_maps_events() {
    let raw = format!(r#"{{"status": "ok", "events": [{ROW}]}}"#);
    match parse_clarify_payload(&raw) {
        AgentReply::Events(events) => assert_eq!(events.len(), 1),
        other => panic!("expected events, got {other:?}"),
    }
}

#[test]
fn clarify_question_is_surfaced() {
    let raw = r#"{"status": "clarify", "question": "В котором часу?"}"#;
    assert_eq!(
        parse_clarify_payload(raw),
        AgentReply::Clarify("В котором часу?".to_string())
    );
}

#[test]
fn clarify_without_question_is_empty() {
    assert_eq!(
        parse_clarify_payload(r#"{"status": "clarify"}"#),
        AgentReply::Empty
    );
    assert_eq!(
        parse_clarify_payload(r#"{"status": "clarify", "question": "  "}"#),
        AgentReply::Empty
    );
}

#[test]
fn clarify_object_inside_fenced_prose_parses() {
    let raw = "Мой ответ:\n```\n{\"status\": \"clarify\", \"question\": \"Когда?\"}\n```";
    assert_eq!(
        parse_clarify_payload(raw),
        AgentReply::Clarify("Когда?".to_string())
    );
}

#[test]
fn clarify_malformed_payload_is_empty() {
    assert_eq!(parse_clarify_payload(""), AgentReply::Empty);
    assert_eq!(parse_clarify_payload("{broken"), AgentReply::Empty);
    assert_eq!(parse_clarify_payload("[1, 2, 3]"), AgentReply::Empty);
    assert_eq!(
        parse_clarify_payload(r#"{"status": "ok", "events": "нет"}"#),
        AgentReply::Empty
    );
}
