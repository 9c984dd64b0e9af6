//! # eventdesk-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `EventRepository`: CRUD for events plus the coordinator reverse lookup
//!   - `UserRepository`: create, read and delete users
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EventService`: create, list, get, update, delete, events per coordinator
//!   - `UserService`: create, list, get, delete
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `eventdesk-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
