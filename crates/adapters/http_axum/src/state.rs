//! Shared application state for axum handlers.

use std::sync::Arc;

use eventdesk_app::ports::{EventRepository, UserRepository};
use eventdesk_app::services::event_service::EventService;
use eventdesk_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<ER, UR> {
    /// Event CRUD service, also used for the coordinator reverse lookup.
    pub event_service: Arc<EventService<ER, UR>>,
    /// User service.
    pub user_service: Arc<UserService<UR>>,
    /// Externally visible base URL for hyperlinks. When unset, links are
    /// built from the request's `Host` header.
    pub public_url: Option<Arc<str>>,
}

impl<ER, UR> Clone for AppState<ER, UR> {
    fn clone(&self) -> Self {
        Self {
            event_service: Arc::clone(&self.event_service),
            user_service: Arc::clone(&self.user_service),
            public_url: self.public_url.clone(),
        }
    }
}

impl<ER, UR> AppState<ER, UR>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(event_service: EventService<ER, UR>, user_service: UserService<UR>) -> Self {
        Self {
            event_service: Arc::new(event_service),
            user_service: Arc::new(user_service),
            public_url: None,
        }
    }

    /// Render hyperlinks against `url` instead of the request host.
    #[must_use]
    pub fn with_public_url(mut self, url: impl Into<Arc<str>>) -> Self {
        self.public_url = Some(url.into());
        self
    }
}
