//! Completion service client for inventory-chat

mod ai_types;
mod client;
mod completion;
mod error;

#[cfg(test)]
mod retry_tests;
#[cfg(test)]
mod tests;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmClient, LlmConfig, truncate};
pub use completion::CompletionService;
pub use error::LlmError;
