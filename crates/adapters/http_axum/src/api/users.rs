//! JSON REST handlers for users.
//!
//! Users are read-only after creation over HTTP; the `events` field is
//! looked up from the event side on every request.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use eventdesk_app::ports::{EventRepository, UserRepository};
use eventdesk_domain::id::UserId;

use crate::api::{ItemId, parse_body};
use crate::error::ApiError;
use crate::links::Links;
use crate::serializers::user::{self, UserRow};
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Value>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Value>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created { location: String, body: Json<Value> },
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created { location, body } => {
                (StatusCode::CREATED, [(LOCATION, location)], body).into_response()
            }
        }
    }
}

/// `GET /users/`
pub async fn list<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
) -> Result<ListResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let users = state.user_service.list_users().await?;
    let mut rendered = Vec::with_capacity(users.len());
    for found in users {
        let events = state.event_service.events_for_coordinator(found.id).await?;
        rendered.push(user::render(&UserRow::new(found, &events), &links));
    }
    Ok(ListResponse::Ok(Json(rendered)))
}

/// `POST /users/`
pub async fn create<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
    body: Bytes,
) -> Result<CreateResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let payload = parse_body(&body)?;
    let changes = user::parse(&payload, &links)?;
    let created = state.user_service.create_user(changes).await?;
    let location = links.user(created.id);
    let row = UserRow::new(created, &[]);
    Ok(CreateResponse::Created {
        location,
        body: Json(user::render(&row, &links)),
    })
}

/// `GET /users/:id`
pub async fn get<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
    ItemId(user_id): ItemId<UserId>,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let found = state.user_service.get_user(user_id).await?;
    let events = state.event_service.events_for_coordinator(user_id).await?;
    Ok(GetResponse::Ok(Json(user::render(
        &UserRow::new(found, &events),
        &links,
    ))))
}
