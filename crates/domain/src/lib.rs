//! # eventdesk-domain
//!
//! Pure domain model for the eventdesk API.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Events** (scheduled talks with an optional coordinator)
//! - Define **Users** (people who coordinate events)
//! - Define the change sets used for create and update
//! - Contain all invariant enforcement (required fields, lengths, usernames)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod user;
