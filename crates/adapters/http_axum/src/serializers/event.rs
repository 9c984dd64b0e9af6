//! Field table for events.

use serde_json::Value;

use eventdesk_domain::error::{ValidationError, ValidationErrors};
use eventdesk_domain::event::{Event, EventChanges};
use eventdesk_domain::id::UserId;

use super::{Field, json_type, render_time, text, timestamp};
use crate::links::Links;

/// `url, id, title, presenter, time, location, coordinator, description`.
pub static FIELDS: &[Field<Event, EventChanges>] = &[
    Field {
        name: "url",
        render: render_url,
        parse: None,
    },
    Field {
        name: "id",
        render: render_id,
        parse: None,
    },
    Field {
        name: "title",
        render: render_title,
        parse: Some(parse_title),
    },
    Field {
        name: "presenter",
        render: render_presenter,
        parse: Some(parse_presenter),
    },
    Field {
        name: "time",
        render: render_event_time,
        parse: Some(parse_time),
    },
    Field {
        name: "location",
        render: render_location,
        parse: Some(parse_location),
    },
    Field {
        name: "coordinator",
        render: render_coordinator,
        parse: Some(parse_coordinator),
    },
    Field {
        name: "description",
        render: render_description,
        parse: Some(parse_description),
    },
];

/// Render one event.
#[must_use]
pub fn render(event: &Event, links: &Links) -> Value {
    super::render(FIELDS, event, links)
}

/// Parse a create or update payload into event changes.
///
/// # Errors
///
/// Returns every field that could not be read.
pub fn parse(payload: &Value, links: &Links) -> Result<EventChanges, ValidationErrors> {
    super::parse(FIELDS, payload, links)
}

fn render_url(event: &Event, links: &Links) -> Value {
    Value::String(links.event(event.id))
}

fn render_id(event: &Event, _: &Links) -> Value {
    Value::from(event.id.get())
}

fn render_title(event: &Event, _: &Links) -> Value {
    Value::String(event.title.clone())
}

fn render_presenter(event: &Event, _: &Links) -> Value {
    Value::String(event.presenter.clone())
}

fn render_event_time(event: &Event, _: &Links) -> Value {
    render_time(&event.time)
}

fn render_location(event: &Event, _: &Links) -> Value {
    Value::String(event.location.clone())
}

fn render_description(event: &Event, _: &Links) -> Value {
    Value::String(event.description.clone())
}

fn render_coordinator(event: &Event, links: &Links) -> Value {
    event
        .coordinator
        .map_or(Value::Null, |id| Value::String(links.user(id)))
}

fn parse_title(value: &Value, _: &Links, changes: &mut EventChanges) -> Result<(), ValidationError> {
    changes.title = Some(text("title", value)?);
    Ok(())
}

fn parse_presenter(
    value: &Value,
    _: &Links,
    changes: &mut EventChanges,
) -> Result<(), ValidationError> {
    changes.presenter = Some(text("presenter", value)?);
    Ok(())
}

fn parse_time(value: &Value, _: &Links, changes: &mut EventChanges) -> Result<(), ValidationError> {
    changes.time = Some(timestamp("time", value)?);
    Ok(())
}

fn parse_location(
    value: &Value,
    _: &Links,
    changes: &mut EventChanges,
) -> Result<(), ValidationError> {
    changes.location = Some(text("location", value)?);
    Ok(())
}

fn parse_description(
    value: &Value,
    _: &Links,
    changes: &mut EventChanges,
) -> Result<(), ValidationError> {
    changes.description = Some(text("description", value)?);
    Ok(())
}

/// A hyperlink, a bare id, or null to clear. An empty string counts as null.
fn parse_coordinator(
    value: &Value,
    links: &Links,
    changes: &mut EventChanges,
) -> Result<(), ValidationError> {
    const FIELD: &str = "coordinator";
    let coordinator = match value {
        Value::Null => None,
        Value::String(href) if href.is_empty() => None,
        Value::String(href) => Some(
            links
                .resolve_user(href)
                .ok_or(ValidationError::NoUrlMatch { field: FIELD })?,
        ),
        Value::Number(n) => Some(
            n.as_i64()
                .filter(|id| *id > 0)
                .map(UserId::new)
                .ok_or(ValidationError::DoesNotExist { field: FIELD })?,
        ),
        other => {
            return Err(ValidationError::IncorrectType {
                field: FIELD,
                received: json_type(other),
            });
        }
    };
    changes.coordinator = Some(coordinator);
    Ok(())
}
