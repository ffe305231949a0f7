//! IdentityStore implementation for PgStorage.

use async_trait::async_trait;
use inventory_chat_core::{Role, SessionToken, UserIdentity};
use sqlx::Row;

use super::PgStorage;
use crate::error::StorageError;
use crate::traits::IdentityStore;

#[async_trait]
impl IdentityStore for PgStorage {
    async fn current_user(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserIdentity>, StorageError> {
        let row = sqlx::query(
            "SELECT a.username, a.is_admin, s.issued_at, s.expires_at
             FROM account_session s
             JOIN account a ON a.username = s.username
             WHERE s.token = $1 AND s.expires_at > NOW()",
        )
        .bind(token.expose())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| {
            let flag: String = r.try_get("is_admin")?;
            Ok(UserIdentity {
                username: r.try_get("username")?,
                role: Role::from_flag(&flag),
                session_token: token.clone(),
                issued_at: r.try_get("issued_at")?,
                expires_at: r.try_get("expires_at")?,
            })
        })
        .transpose()
    }
}
