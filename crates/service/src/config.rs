use std::time::Duration;

use inventory_chat_core::constants::{
    DEFAULT_SCHEMA_TTL_SECS, DEFAULT_SESSION_IDLE_TTL_SECS, MAX_HISTORY_ROWS,
};
use inventory_chat_core::{PolicyConfig, env_parse_with_default};

/// Runtime settings of the chat service.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub policy: PolicyConfig,
    /// Schema snapshots older than this are fetched again before a prompt is built.
    pub schema_ttl: Duration,
    /// Sessions without activity for this long are closed by the sweeper.
    pub session_idle_ttl: Duration,
    /// History rows replayed into a new session.
    pub history_limit: i64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            schema_ttl: Duration::from_secs(DEFAULT_SCHEMA_TTL_SECS),
            session_idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
            history_limit: MAX_HISTORY_ROWS,
        }
    }
}

impl ChatSettings {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            policy: PolicyConfig::from_env(),
            schema_ttl: Duration::from_secs(env_parse_with_default(
                "INVENTORY_CHAT_SCHEMA_TTL_SECS",
                DEFAULT_SCHEMA_TTL_SECS,
            )),
            session_idle_ttl: Duration::from_secs(env_parse_with_default(
                "INVENTORY_CHAT_SESSION_IDLE_TTL_SECS",
                DEFAULT_SESSION_IDLE_TTL_SECS,
            )),
            history_limit: MAX_HISTORY_ROWS,
        }
    }
}
