//! Storage port — repository traits for persistence.
//!
//! Implementations own id assignment: `create` receives a row without an id
//! and returns it with the one storage picked. Ids are never reused.

use std::future::Future;

use eventdesk_domain::error::EventDeskError;
use eventdesk_domain::event::{Event, NewEvent};
use eventdesk_domain::id::{EventId, UserId};
use eventdesk_domain::user::{NewUser, User};

/// Repository for persisting and querying [`Event`]s.
pub trait EventRepository {
    /// Insert a new event and return it with its assigned id.
    ///
    /// A `coordinator` that no longer exists at write time must be reported
    /// as a validation error on the `coordinator` field.
    fn create(&self, event: NewEvent) -> impl Future<Output = Result<Event, EventDeskError>> + Send;

    /// Get an event by its unique identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventDeskError>> + Send;

    /// Get all events, ordered by id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventDeskError>> + Send;

    /// Get the events coordinated by `user_id`, ordered by id.
    fn find_by_coordinator(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Event>, EventDeskError>> + Send;

    /// Overwrite every field of an existing event.
    ///
    /// Returns a not-found error when the row is gone.
    fn update(&self, event: Event) -> impl Future<Output = Result<Event, EventDeskError>> + Send;

    /// Delete an event, returning whether a row was removed.
    fn delete(&self, id: EventId) -> impl Future<Output = Result<bool, EventDeskError>> + Send;
}

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    /// Insert a new user and return it with its assigned id.
    ///
    /// A username already taken at write time must be reported as
    /// [`ValidationError::UsernameTaken`](eventdesk_domain::error::ValidationError::UsernameTaken).
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, EventDeskError>> + Send;

    /// Get a user by its unique identifier.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, EventDeskError>> + Send;

    /// Get all users, ordered by id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<User>, EventDeskError>> + Send;

    /// Delete a user, returning whether a row was removed.
    ///
    /// Events coordinated by the user are kept, with their coordinator cleared.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<bool, EventDeskError>> + Send;
}
