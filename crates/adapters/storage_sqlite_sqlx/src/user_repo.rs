//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eventdesk_app::ports::UserRepository;
use eventdesk_domain::error::{EventDeskError, ValidationError};
use eventdesk_domain::id::UserId;
use eventdesk_domain::user::{NewUser, User};

use crate::error::{StorageError, is_unique_violation};

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;

        Ok(Self(User {
            id: UserId::new(id),
            username,
        }))
    }
}

const INSERT: &str = "INSERT INTO users (username) VALUES (?)";
const SELECT_BY_ID: &str = "SELECT id, username FROM users WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, username FROM users ORDER BY id";
const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, EventDeskError> {
        let result = sqlx::query(INSERT)
            .bind(&user.username)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(user.into_user(UserId::new(done.last_insert_rowid()))),
            Err(err) if is_unique_violation(&err) => Err(ValidationError::UsernameTaken.into()),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, EventDeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<User>, EventDeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete(&self, id: UserId) -> Result<bool, EventDeskError> {
        let done = sqlx::query(DELETE_BY_ID)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(done.rows_affected() > 0)
    }
}
