//! Service layer for inventory-chat
//!
//! Owns chat sessions and drives each turn through prompt, completion,
//! policy and the confirm/cancel flow between HTTP handlers and storage/llm.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::cognitive_complexity, reason = "Complex async flows are inherent")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]
#![allow(clippy::let_underscore_must_use, reason = "Intentionally ignoring results")]

mod chat_service;
mod chat_session;
mod config;
mod error;

pub use chat_service::{ChatService, Collaborators, TurnOutcome};
pub use chat_session::{ChatSession, FlowState, SessionView};
pub use config::ChatSettings;
pub use error::ServiceError;
