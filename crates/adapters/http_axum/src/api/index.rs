//! API root.

use axum::Json;
use serde_json::{Value, json};

use crate::links::Links;

/// `GET /`: hyperlinks to every collection.
pub async fn root(links: Links) -> Json<Value> {
    Json(json!({
        "users": links.users(),
        "events": links.events(),
    }))
}
