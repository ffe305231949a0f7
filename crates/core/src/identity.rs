use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role flag of a user. Stored as `"yes"` / `"no"` in the `account.is_admin` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Value written to the `account.is_admin` column.
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::Admin => "yes",
            Self::Member => "no",
        }
    }

    /// Anything other than an explicit yes is a non-admin.
    #[must_use]
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" | "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque session credential. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Authenticated user, immutable for the lifetime of a chat session.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub username: String,
    pub role: Role,
    pub session_token: SessionToken,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UserIdentity {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_flag() {
        assert_eq!(Role::from_flag("yes"), Role::Admin);
        assert_eq!(Role::from_flag(" YES "), Role::Admin);
        assert_eq!(Role::from_flag("no"), Role::Member);
        assert_eq!(Role::from_flag(""), Role::Member);
        assert_eq!(Role::from_flag("unknown"), Role::Member);
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("secret-value");
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
        assert_eq!(token.expose(), "secret-value");
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let identity = UserIdentity {
            username: "budi".to_owned(),
            role: Role::Member,
            session_token: SessionToken::new("t"),
            issued_at: now - chrono::Duration::hours(1),
            expires_at: now,
        };
        assert!(identity.is_expired_at(now));
        assert!(!identity.is_expired_at(now - chrono::Duration::seconds(1)));
    }
}
