//! JSON REST handlers for events.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use eventdesk_app::ports::{EventRepository, UserRepository};
use eventdesk_app::services::event_service::UpdateMode;
use eventdesk_domain::id::EventId;

use crate::api::{ItemId, parse_body};
use crate::error::ApiError;
use crate::links::Links;
use crate::serializers::event;
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

/// Possible responses from the get and update endpoints.
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
    /// The new event, with its `url` repeated in the `Location` header.
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

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /events/`
pub async fn list<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
) -> Result<ListResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let events = state.event_service.list_events().await?;
    let rendered = events.iter().map(|e| event::render(e, &links)).collect();
    Ok(ListResponse::Ok(Json(rendered)))
}

/// `POST /events/`
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
    let changes = event::parse(&payload, &links)?;
    let created = state.event_service.create_event(changes).await?;
    Ok(CreateResponse::Created {
        location: links.event(created.id),
        body: Json(event::render(&created, &links)),
    })
}

/// `GET /events/:id`
pub async fn get<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
    ItemId(event_id): ItemId<EventId>,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let found = state.event_service.get_event(event_id).await?;
    Ok(GetResponse::Ok(Json(event::render(&found, &links))))
}

/// `PUT /events/:id`. Every required field must be supplied.
pub async fn replace<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
    ItemId(event_id): ItemId<EventId>,
    body: Bytes,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    apply_update(&state, &links, event_id, &body, UpdateMode::Full).await
}

/// `PATCH /events/:id`. Only supplied fields change.
pub async fn update<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    links: Links,
    ItemId(event_id): ItemId<EventId>,
    body: Bytes,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    apply_update(&state, &links, event_id, &body, UpdateMode::Partial).await
}

/// `DELETE /events/:id`
pub async fn delete<ER, UR>(
    State(state): State<AppState<ER, UR>>,
    _links: Links,
    ItemId(event_id): ItemId<EventId>,
) -> Result<DeleteResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    state.event_service.delete_event(event_id).await?;
    Ok(DeleteResponse::NoContent)
}

async fn apply_update<ER, UR>(
    state: &AppState<ER, UR>,
    links: &Links,
    event_id: EventId,
    body: &Bytes,
    mode: UpdateMode,
) -> Result<GetResponse, ApiError>
where
    ER: EventRepository + Send + Sync + 'static,
    UR: UserRepository + Send + Sync + 'static,
{
    let payload = parse_body(body)?;
    let changes = event::parse(&payload, links)?;
    let updated = state
        .event_service
        .update_event(event_id, changes, mode)
        .await?;
    Ok(GetResponse::Ok(Json(event::render(&updated, links))))
}
