// File: ./src/model/preview.rs
//! Human-readable rendering of candidate events for the confirmation step.
use crate::model::event::{ADDRESS_SEPARATOR, PLACEHOLDER_DESCRIPTION, ParsedEvent};

/// Splits a description that carries a folded-in place back into
/// (description, place). Handles both the `| Адрес:` convention used for
/// agent-supplied addresses and the plain `venue | address` form produced by
/// the ticket heuristic.
pub fn split_place(description: &str) -> (&str, Option<&str>) {
    if let Some((main, place)) = description.split_once(ADDRESS_SEPARATOR) {
        let place = place.trim();
        return (
            main.trim(),
            if place.is_empty() { None } else { Some(place) },
        );
    }
    if let Some((main, place)) = description.split_once(" | ") {
        let place = place.trim();
        return (
            main.trim(),
            if place.is_empty() { None } else { Some(place) },
        );
    }
    (description.trim(), None)
}

fn time_text(event: &ParsedEvent) -> String {
    match event.stop_time {
        Some(stop) => format!(
            "{}–{}",
            event.start_time.format("%H:%M"),
            stop.format("%H:%M")
        ),
        None => event.start_time.format("%H:%M").to_string(),
    }
}

/// One block per event: index header, date, time (or range), description and,
/// when the description encodes a venue, a separate place line.
pub fn preview_blocks(events: &[ParsedEvent], locale: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (idx, event) in events.iter().enumerate() {
        let (mut description, place) = split_place(&event.description);
        if description.is_empty() {
            description = PLACEHOLDER_DESCRIPTION;
        }

        lines.push(
            rust_i18n::t!("preview_event_header", locale = locale, index = idx + 1).to_string(),
        );
        lines.push(
            rust_i18n::t!(
                "preview_date",
                locale = locale,
                date = event.event_date.format("%d.%m.%Y")
            )
            .to_string(),
        );
        lines.push(
            rust_i18n::t!("preview_time", locale = locale, time = time_text(event)).to_string(),
        );
        lines.push(
            rust_i18n::t!(
                "preview_description",
                locale = locale,
                description = description
            )
            .to_string(),
        );
        if let Some(place) = place {
            lines.push(
                rust_i18n::t!("preview_place", locale = locale, place = place).to_string(),
            );
        }
        lines.push(String::new());
    }
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Bullet lines echoed after a successful save, capped at `limit` events.
pub fn saved_lines(events: &[ParsedEvent], limit: usize) -> Vec<String> {
    events
        .iter()
        .take(limit)
        .map(|event| {
            format!(
                "• {} {} — {}",
                event.event_date.format("%d.%m.%Y"),
                event.start_time.format("%H:%M"),
                event.description
            )
        })
        .collect()
}
