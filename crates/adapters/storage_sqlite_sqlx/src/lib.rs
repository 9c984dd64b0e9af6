//! # eventdesk-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `eventdesk-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Translate constraint violations (unique username, missing coordinator)
//!   into domain validation errors
//!
//! ## Dependency rule
//! Depends on `eventdesk-app` (for port traits) and `eventdesk-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod event_repo;
pub mod pool;
pub mod user_repo;

pub use event_repo::SqliteEventRepository;
pub use pool::{Config, Database};
pub use user_repo::SqliteUserRepository;
