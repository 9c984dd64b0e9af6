//! Field table for users.

use serde_json::Value;

use eventdesk_domain::error::{ValidationError, ValidationErrors};
use eventdesk_domain::event::Event;
use eventdesk_domain::id::EventId;
use eventdesk_domain::user::{User, UserChanges};

use super::{Field, text};
use crate::links::Links;

/// A user together with the ids of the events it coordinates.
///
/// Built per request from a fresh reverse lookup; never stored.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub user: User,
    pub events: Vec<EventId>,
}

impl UserRow {
    #[must_use]
    pub fn new(user: User, events: &[Event]) -> Self {
        Self {
            user,
            events: events.iter().map(|event| event.id).collect(),
        }
    }
}

/// `url, id, username, events`.
pub static FIELDS: &[Field<UserRow, UserChanges>] = &[
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
        name: "username",
        render: render_username,
        parse: Some(parse_username),
    },
    Field {
        name: "events",
        render: render_events,
        parse: None,
    },
];

/// Render one user with its coordinated events.
#[must_use]
pub fn render(row: &UserRow, links: &Links) -> Value {
    super::render(FIELDS, row, links)
}

/// Parse a create payload into user changes.
///
/// # Errors
///
/// Returns every field that could not be read.
pub fn parse(payload: &Value, links: &Links) -> Result<UserChanges, ValidationErrors> {
    super::parse(FIELDS, payload, links)
}

fn render_url(row: &UserRow, links: &Links) -> Value {
    Value::String(links.user(row.user.id))
}

fn render_id(row: &UserRow, _: &Links) -> Value {
    Value::from(row.user.id.get())
}

fn render_username(row: &UserRow, _: &Links) -> Value {
    Value::String(row.user.username.clone())
}

fn render_events(row: &UserRow, links: &Links) -> Value {
    row.events
        .iter()
        .map(|id| Value::String(links.event(*id)))
        .collect()
}

fn parse_username(
    value: &Value,
    _: &Links,
    changes: &mut UserChanges,
) -> Result<(), ValidationError> {
    changes.username = Some(text("username", value)?);
    Ok(())
}
