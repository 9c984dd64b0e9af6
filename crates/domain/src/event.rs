//! Events: a scheduled talk or session, optionally run by a coordinator.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationErrors};
use crate::id::{EventId, UserId};
use crate::time::{self, Timestamp};

/// Maximum length, in characters, of the short text fields.
pub const SHORT_TEXT_MAX: usize = 256;

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub presenter: String,
    pub time: Timestamp,
    pub location: String,
    /// The [`User`](crate::user::User) organising this event, if any.
    pub coordinator: Option<UserId>,
    pub description: String,
}

impl Event {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns every failed rule: blank `title`, or a short text field
    /// longer than [`SHORT_TEXT_MAX`].
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        check_fields(&self.title, &self.presenter, &self.location)
    }
}

/// An event that has not been stored yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub presenter: String,
    pub time: Timestamp,
    pub location: String,
    pub coordinator: Option<UserId>,
    pub description: String,
}

impl NewEvent {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Same rules as [`Event::validate`].
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        check_fields(&self.title, &self.presenter, &self.location)
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            presenter: self.presenter,
            time: self.time,
            location: self.location,
            coordinator: self.coordinator,
            description: self.description,
        }
    }
}

/// Field values supplied by a create or update request.
///
/// `None` means the field was absent from the payload. For `coordinator`,
/// `Some(None)` means it was explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub presenter: Option<String>,
    pub time: Option<Timestamp>,
    pub location: Option<String>,
    pub coordinator: Option<Option<UserId>>,
    pub description: Option<String>,
}

impl EventChanges {
    /// Ensure every required field is present, as a full replacement needs.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for a missing `title`.
    pub fn check_complete(&self) -> Result<(), ValidationErrors> {
        if self.title.is_none() {
            return Err(ValidationError::Required { field: "title" }.into());
        }
        Ok(())
    }

    /// The coordinator this change set points to, if it sets one.
    #[must_use]
    pub fn coordinator(&self) -> Option<UserId> {
        self.coordinator.flatten()
    }

    /// Turn the changes into a new event, filling defaults.
    ///
    /// Optional text fields default to empty and `time` defaults to `now`.
    ///
    /// # Errors
    ///
    /// Returns every failed rule, starting with a missing `title`.
    pub fn into_new_event(self, now: Timestamp) -> Result<NewEvent, ValidationErrors> {
        self.check_complete()?;
        let event = NewEvent {
            title: self.title.unwrap_or_default(),
            presenter: self.presenter.unwrap_or_default(),
            time: self.time.map_or(now, time::truncate),
            location: self.location.unwrap_or_default(),
            coordinator: self.coordinator.flatten(),
            description: self.description.unwrap_or_default(),
        };
        event.validate()?;
        Ok(event)
    }

    /// Merge the supplied fields into `event`; absent fields keep their value.
    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(presenter) = self.presenter {
            event.presenter = presenter;
        }
        if let Some(time) = self.time {
            event.time = time::truncate(time);
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(coordinator) = self.coordinator {
            event.coordinator = coordinator;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
    }
}

fn check_fields(title: &str, presenter: &str, location: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if title.trim().is_empty() {
        errors.push(ValidationError::Blank { field: "title" });
    }
    for (field, value) in [("title", title), ("presenter", presenter), ("location", location)] {
        if value.chars().count() > SHORT_TEXT_MAX {
            errors.push(ValidationError::TooLong {
                field,
                max: SHORT_TEXT_MAX,
            });
        }
    }
    errors.into_result()
}
