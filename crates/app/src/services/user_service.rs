//! User service — use-cases for managing users.

use eventdesk_domain::error::{EventDeskError, NotFoundError};
use eventdesk_domain::id::UserId;
use eventdesk_domain::user::{User, UserChanges};

use crate::ports::UserRepository;

/// Application service for user operations.
pub struct UserService<R> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new user after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::Validation`] if the username is missing,
    /// malformed or already taken, or a storage error from the repository.
    #[tracing::instrument(skip(self, changes), fields(username = ?changes.username))]
    pub async fn create_user(&self, changes: UserChanges) -> Result<User, EventDeskError> {
        let user = changes.into_new_user()?;
        let created = self.repo.create(user).await?;
        tracing::debug!(user_id = %created.id, "user created");
        Ok(created)
    }

    /// Look up a user by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, EventDeskError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_users(&self) -> Result<Vec<User>, EventDeskError> {
        self.repo.get_all().await
    }

    /// Delete a user by id. Events it coordinated lose their coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`EventDeskError::NotFound`] when no user with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), EventDeskError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id).into())
        }
    }
}

fn not_found(id: UserId) -> NotFoundError {
    NotFoundError {
        entity: "User",
        id: id.to_string(),
    }
}
