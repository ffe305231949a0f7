//! Storage backend trait abstraction
//!
//! One async trait per collaborator the chat pipeline talks to, so the
//! service layer can be exercised against in-memory fakes.

pub mod execution;
pub mod history;
pub mod identity;
pub mod inventory;
pub mod schema;

pub use execution::ActionExecutor;
pub use history::HistoryStore;
pub use identity::IdentityStore;
pub use inventory::InventoryStore;
pub use schema::SchemaStore;
