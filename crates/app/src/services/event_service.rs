//! Event service — use-cases for managing events.

use eventdesk_domain::error::{EventDeskError, NotFoundError, ValidationError};
use eventdesk_domain::event::{Event, EventChanges};
use eventdesk_domain::id::{EventId, UserId};
use eventdesk_domain::time::now;

use crate::ports::{EventRepository, UserRepository};

/// How an update request treats fields missing from its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every required field must be supplied (`PUT`).
    Full,
    /// Only supplied fields are touched (`PATCH`).
    Partial,
}

/// Application service for event CRUD operations.
///
/// Holds a user repository as well, to check that a referenced coordinator
/// exists before writing.
pub struct EventService<ER, UR> {
    events: ER,
    users: UR,
}

impl<ER: EventRepository, UR: UserRepository> EventService<ER, UR> {
    /// Create a new service backed by the given repositories.
    pub fn new(events: ER, users: UR) -> Self {
        Self { events, users }
    }

    /// Create a new event from request changes.
    ///
    /// Missing optional fields take their defaults and a missing `time`
    /// becomes the current time.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::Validation`] if invariants fail or the
    /// coordinator does not exist, or a storage error from the repository.
    #[tracing::instrument(skip(self, changes), fields(title = ?changes.title))]
    pub async fn create_event(&self, changes: EventChanges) -> Result<Event, EventDeskError> {
        let event = changes.into_new_event(now())?;
        self.ensure_coordinator_exists(event.coordinator).await?;
        let created = self.events.create(event).await?;
        tracing::debug!(event_id = %created.id, "event created");
        Ok(created)
    }

    /// Look up an event by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::NotFound`] when no event with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: EventId) -> Result<Event, EventDeskError> {
        self.events
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    /// List all events.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_events(&self) -> Result<Vec<Event>, EventDeskError> {
        self.events.get_all().await
    }

    /// List the events whose coordinator is `user_id`.
    ///
    /// Always queried from the event side, so the result reflects the latest
    /// writes.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn events_for_coordinator(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Event>, EventDeskError> {
        self.events.find_by_coordinator(user_id).await
    }

    /// Merge `changes` into an existing event and store the result.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::NotFound`] when no event with `id` exists,
    /// [`EventDeskError::Validation`] when a required field is missing in
    /// [`UpdateMode::Full`], an invariant fails or the coordinator does not
    /// exist, or a storage error from the repository.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_event(
        &self,
        id: EventId,
        changes: EventChanges,
        mode: UpdateMode,
    ) -> Result<Event, EventDeskError> {
        let mut event = self.get_event(id).await?;
        if mode == UpdateMode::Full {
            changes.check_complete()?;
        }
        let coordinator = changes.coordinator();
        changes.apply(&mut event);
        event.validate()?;
        self.ensure_coordinator_exists(coordinator).await?;
        self.events.update(event).await
    }

    /// Delete an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::NotFound`] when no event with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> Result<(), EventDeskError> {
        if self.events.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id).into())
        }
    }

    async fn ensure_coordinator_exists(
        &self,
        coordinator: Option<UserId>,
    ) -> Result<(), EventDeskError> {
        let Some(user_id) = coordinator else {
            return Ok(());
        };
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(ValidationError::DoesNotExist {
                field: "coordinator",
            }
            .into());
        }
        Ok(())
    }
}

fn not_found(id: EventId) -> NotFoundError {
    NotFoundError {
        entity: "Event",
        id: id.to_string(),
    }
}
