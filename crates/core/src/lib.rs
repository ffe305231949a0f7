//! Core types and policy for inventory-chat
//!
//! This crate contains the domain types shared across all other crates and the
//! pure stages of the chat pipeline: prompt construction, reply parsing and
//! statement policy.

mod action;
mod config;
pub mod constants;
mod conversation;
mod env_config;
mod error;
mod identity;
mod inventory;
mod json_utils;
mod policy;
mod prompt;
mod reply;
mod schema;
pub mod statement;

pub use action::*;
pub use config::PolicyConfig;
pub use conversation::*;
pub use env_config::{env_flag, env_list_with_default, env_parse_with_default};
pub use error::*;
pub use identity::*;
pub use inventory::InventoryItem;
pub use json_utils::strip_markdown_json;
pub use policy::StatementPolicy;
pub use prompt::{PromptInput, build_prompt};
pub use reply::{ModelReply, parse_model_reply, parse_model_reply_or_fallback};
pub use schema::*;
pub use statement::{ParseError, Statement, StatementKind, split_oversized, split_script};
