//! `SQLite` implementation of [`EventRepository`].

use chrono::SecondsFormat;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eventdesk_app::ports::EventRepository;
use eventdesk_domain::error::{EventDeskError, NotFoundError, ValidationError};
use eventdesk_domain::event::{Event, NewEvent};
use eventdesk_domain::id::{EventId, UserId};
use eventdesk_domain::time::Timestamp;

use crate::error::{StorageError, is_foreign_key_violation};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let presenter: String = row.try_get("presenter")?;
        let time_str: String = row.try_get("time")?;
        let location: String = row.try_get("location")?;
        let coordinator_id: Option<i64> = row.try_get("coordinator_id")?;
        let description: String = row.try_get("description")?;

        let time = chrono::DateTime::parse_from_rfc3339(&time_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Event {
            id: EventId::new(id),
            title,
            presenter,
            time,
            location,
            coordinator: coordinator_id.map(UserId::new),
            description,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO events (title, presenter, time, location, coordinator_id, description)
    VALUES (?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM events WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM events ORDER BY id";
const SELECT_BY_COORDINATOR: &str = "SELECT * FROM events WHERE coordinator_id = ? ORDER BY id";

const UPDATE: &str = r"
    UPDATE events
    SET title = ?, presenter = ?, time = ?, location = ?, coordinator_id = ?, description = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM events WHERE id = ?";

/// Timestamps are stored as RFC 3339 text with microsecond precision.
fn encode_time(time: &Timestamp) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Map a write failure, turning a dangling coordinator into a field error.
fn write_error(err: sqlx::Error) -> EventDeskError {
    if is_foreign_key_violation(&err) {
        ValidationError::DoesNotExist {
            field: "coordinator",
        }
        .into()
    } else {
        StorageError::from(err).into()
    }
}

/// `SQLite`-backed event repository.
pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: NewEvent) -> Result<Event, EventDeskError> {
        let done = sqlx::query(INSERT)
            .bind(&event.title)
            .bind(&event.presenter)
            .bind(encode_time(&event.time))
            .bind(&event.location)
            .bind(event.coordinator.map(UserId::get))
            .bind(&event.description)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(event.into_event(EventId::new(done.last_insert_rowid())))
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, EventDeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Event>, EventDeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_coordinator(&self, user_id: UserId) -> Result<Vec<Event>, EventDeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_COORDINATOR)
            .bind(user_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, event: Event) -> Result<Event, EventDeskError> {
        let done = sqlx::query(UPDATE)
            .bind(&event.title)
            .bind(&event.presenter)
            .bind(encode_time(&event.time))
            .bind(&event.location)
            .bind(event.coordinator.map(UserId::get))
            .bind(&event.description)
            .bind(event.id.get())
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        if done.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Event",
                id: event.id.to_string(),
            }
            .into());
        }
        Ok(event)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventDeskError> {
        let done = sqlx::query(DELETE_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(done.rows_affected() > 0)
    }
}
