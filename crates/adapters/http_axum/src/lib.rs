//! # eventdesk-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **hyperlinked JSON API** (`/`, `/events/`, `/users/`, …)
//! - Describe each resource as an explicit **field table** that drives both
//!   rendering and payload parsing (see [`serializers`])
//! - Build absolute hyperlinks from an explicit per-request [`links::Links`]
//!   context instead of ambient request state
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `eventdesk-app` (for port traits and services) and
//! `eventdesk-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod links;
pub mod router;
pub mod serializers;
pub mod state;
