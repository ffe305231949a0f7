use async_trait::async_trait;
use inventory_chat_core::{SessionToken, UserIdentity};

use crate::error::StorageError;

/// Authentication lookups against the web application's session table.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Resolve a session token to its user. Unknown and expired tokens yield `None`.
    async fn current_user(&self, token: &SessionToken)
    -> Result<Option<UserIdentity>, StorageError>;
}
