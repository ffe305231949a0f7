//! Storage layer for inventory-chat
//!
//! PostgreSQL-backed collaborators for the chat pipeline: identity lookup,
//! schema snapshots, chat history, confirmed-action execution and the
//! inventory view.

pub mod error;
mod pg_migrations;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
