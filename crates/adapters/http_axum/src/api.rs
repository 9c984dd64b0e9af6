//! JSON REST API handler modules.
//!
//! Every collection and item route is registered twice, once with a trailing
//! slash and once with a `.json` format suffix.

#[allow(clippy::missing_errors_doc)]
pub mod events;
pub mod index;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::routing::get;
use serde_json::{Map, Value};

use eventdesk_app::ports::{EventRepository, UserRepository};
use eventdesk_domain::id::{EventId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the API router.
pub fn routes<ER, UR>() -> Router<AppState<ER, UR>>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let event_list = get(events::list::<ER, UR>).post(events::create::<ER, UR>);
    let event_detail = get(events::get::<ER, UR>)
        .put(events::replace::<ER, UR>)
        .patch(events::update::<ER, UR>)
        .delete(events::delete::<ER, UR>);
    let user_list = get(users::list::<ER, UR>).post(users::create::<ER, UR>);
    let user_detail = get(users::get::<ER, UR>);

    Router::new()
        .route("/", get(index::root))
        // Events
        .route("/events/", event_list.clone())
        .route("/events.json", event_list)
        .route("/events/{id}/", event_detail.clone())
        .route("/events/{id}", event_detail)
        // Users
        .route("/users/", user_list.clone())
        .route("/users.json", user_list)
        .route("/users/{id}/", user_detail.clone())
        .route("/users/{id}", user_detail)
}

/// A resource id that can appear in an item path.
pub trait Item: From<i64> + Send {
    /// Resource name used in not-found messages.
    const ENTITY: &'static str;
}

impl Item for EventId {
    const ENTITY: &'static str = "Event";
}

impl Item for UserId {
    const ENTITY: &'static str = "User";
}

/// Item id extracted from `/{id}/` or `/{id}.json`.
///
/// Any other spelling of the path cannot name a row, so it is a not-found.
pub struct ItemId<T>(pub T);

impl<S, T> FromRequestParts<S> for ItemId<T>
where
    S: Send + Sync,
    T: Item,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::UnknownId {
                entity: T::ENTITY,
                raw: parts.uri.path().to_string(),
            })?;
        let slashed = parts.uri.path().ends_with('/');
        parse_id(&raw, slashed, T::ENTITY).map(Self)
    }
}

/// Parse a non-empty run of ASCII digits; signs and whitespace are rejected.
pub(crate) fn parse_digits(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Parse the `{id}` segment of an item path.
///
/// Behind a trailing slash the segment is the bare id; without one only the
/// `.json` form names an item.
pub(crate) fn parse_id<T: From<i64>>(
    raw: &str,
    slashed: bool,
    entity: &'static str,
) -> Result<T, ApiError> {
    let digits = if slashed {
        Some(raw)
    } else {
        raw.strip_suffix(".json")
    };
    digits
        .and_then(parse_digits)
        .map(T::from)
        .ok_or_else(|| ApiError::UnknownId {
            entity,
            raw: raw.to_string(),
        })
}

/// Decode a request body as JSON; an empty body is an empty object.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(ApiError::MalformedBody)
}
