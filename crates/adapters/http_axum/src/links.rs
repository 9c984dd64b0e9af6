//! Hyperlink construction and resolution.
//!
//! A [`Links`] value is built once per request, from the configured public
//! URL or the `Host` header, and passed explicitly to every renderer.

use axum::extract::{FromRequestParts, Query};
use axum::http::header::HOST;
use axum::http::request::Parts;
use serde::Deserialize;

use eventdesk_domain::id::{EventId, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// Representation formats selectable with a suffix or `?format=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
}

impl Format {
    /// Look up a format by its suffix, e.g. `json`.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// Builds absolute URLs to the API's endpoints.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
    base_path: String,
    format: Option<Format>,
}

impl Links {
    /// Create links rooted at `base` (e.g. `http://localhost:8000`).
    ///
    /// When `format` is set, every generated URL carries its suffix.
    #[must_use]
    pub fn new(base: &str, format: Option<Format>) -> Self {
        let base = base.trim_end_matches('/').to_string();
        let base_path = url::Url::parse(&base)
            .map(|url| url.path().trim_end_matches('/').to_string())
            .unwrap_or_default();
        Self {
            base,
            base_path,
            format,
        }
    }

    #[must_use]
    pub fn events(&self) -> String {
        self.collection("events")
    }

    #[must_use]
    pub fn event(&self, id: EventId) -> String {
        self.item("events", id.get())
    }

    #[must_use]
    pub fn users(&self) -> String {
        self.collection("users")
    }

    #[must_use]
    pub fn user(&self, id: UserId) -> String {
        self.item("users", id.get())
    }

    /// Resolve a user hyperlink back to its id.
    ///
    /// Accepts absolute URLs on any host and root-relative paths, with or
    /// without a format suffix. Returns `None` when `href` does not point at
    /// a user detail endpoint.
    #[must_use]
    pub fn resolve_user(&self, href: &str) -> Option<UserId> {
        let path = match url::Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                href.split(['?', '#']).next().unwrap_or_default().to_string()
            }
            Err(_) => return None,
        };

        let rest = path
            .strip_prefix(self.base_path.as_str())
            .unwrap_or(&path)
            .strip_prefix("/users/")?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let rest = rest.strip_suffix(".json").unwrap_or(rest);
        crate::api::parse_digits(rest)
            .filter(|id| *id > 0)
            .map(UserId::new)
    }

    fn collection(&self, name: &str) -> String {
        match self.format {
            Some(format) => format!("{}/{name}.{}", self.base, format.suffix()),
            None => format!("{}/{name}/", self.base),
        }
    }

    fn item(&self, name: &str, id: i64) -> String {
        match self.format {
            Some(format) => format!("{}/{name}/{id}.{}", self.base, format.suffix()),
            None => format!("{}/{name}/{id}/", self.base),
        }
    }
}

#[derive(Deserialize)]
struct FormatParams {
    format: Option<String>,
}

/// Format named by the path suffix or the `format` query parameter.
fn requested_format(parts: &Parts) -> Result<Option<Format>, ApiError> {
    if let Ok(Query(FormatParams {
        format: Some(format),
    })) = Query::<FormatParams>::try_from_uri(&parts.uri)
    {
        return Format::from_suffix(&format)
            .map(Some)
            .ok_or(ApiError::UnsupportedFormat(format));
    }

    let last_segment = parts
        .uri
        .path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    Ok(last_segment
        .rsplit_once('.')
        .and_then(|(_, suffix)| Format::from_suffix(suffix)))
}

fn request_host(parts: &Parts) -> &str {
    parts
        .headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| parts.uri.authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or("localhost")
}

impl<ER, UR> FromRequestParts<AppState<ER, UR>> for Links
where
    ER: Send + Sync,
    UR: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<ER, UR>,
    ) -> Result<Self, Self::Rejection> {
        let format = requested_format(parts)?;
        let links = match &state.public_url {
            Some(base) => Self::new(base, format),
            None => Self::new(&format!("http://{}", request_host(parts)), format),
        };
        Ok(links)
    }
}
