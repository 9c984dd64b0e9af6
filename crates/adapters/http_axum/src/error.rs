//! HTTP error response mapping.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventdesk_domain::error::{EventDeskError, ValidationErrors};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    /// Messages per field, only present for validation failures.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<&'static str, Vec<String>>,
}

/// Everything a handler can fail with, mapped to a status code.
#[derive(Debug)]
pub enum ApiError {
    /// An error raised by the application or domain layer.
    Domain(EventDeskError),
    /// The request body is not valid JSON.
    MalformedBody(serde_json::Error),
    /// A `format` other than JSON was requested.
    UnsupportedFormat(String),
    /// A path id that cannot name any row.
    UnknownId { entity: &'static str, raw: String },
}

impl From<EventDeskError> for ApiError {
    fn from(err: EventDeskError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Domain(EventDeskError::Validation(errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = BTreeMap::new();
        let (status, message) = match self {
            Self::Domain(EventDeskError::Validation(errors)) => {
                for err in errors {
                    fields
                        .entry(err.field())
                        .or_insert_with(Vec::new)
                        .push(err.to_string());
                }
                (StatusCode::BAD_REQUEST, "validation failed".to_string())
            }
            Self::Domain(EventDeskError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(EventDeskError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::MalformedBody(err) => (StatusCode::BAD_REQUEST, format!("JSON parse error - {err}")),
            Self::UnsupportedFormat(format) => {
                (StatusCode::NOT_FOUND, format!("unsupported format: {format}"))
            }
            Self::UnknownId { entity, raw } => {
                (StatusCode::NOT_FOUND, format!("{entity} not found: {raw}"))
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                fields,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_domain::error::{NotFoundError, ValidationError};
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_group_validation_messages_by_field() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required { field: "title" });
        errors.push(ValidationError::InvalidTimestamp { field: "time" });

        let response = ApiError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["fields"]["title"][0], "This field is required.");
        assert!(body["fields"]["time"][0].as_str().unwrap().starts_with("Datetime has wrong format"));
    }

    #[tokio::test]
    async fn should_map_not_found_without_fields() {
        let err = EventDeskError::from(NotFoundError {
            entity: "Event",
            id: "3".to_string(),
        });

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Event not found: 3" }));
    }

    #[tokio::test]
    async fn should_hide_storage_details() {
        let err = EventDeskError::Storage("disk on fire".into());

        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal server error");
    }
}
