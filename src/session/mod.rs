//! Authenticated-session context and user administration payloads.
//!
//! The session is an explicit value handed to the workflow engine, not a
//! process-wide singleton: whoever owns the screen lifecycle owns the
//! session and tears it down when the store reports it invalid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::workflow::Role;

/// A dashboard user as served by the store. `role` stays the raw wire
/// string; the typed [`Role`] is derived when a session is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Partial update for a user record; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Reporting window for the user-activity endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPeriod {
    Day,
    Week,
    Month,
    All,
}

impl ActivityPeriod {
    /// Earliest timestamp still inside the window, relative to `now`.
    /// `All` has no lower bound.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            ActivityPeriod::Day => Some(now - chrono::Duration::days(1)),
            ActivityPeriod::Week => Some(now - chrono::Duration::weeks(1)),
            ActivityPeriod::Month => Some(now - chrono::Duration::days(30)),
            ActivityPeriod::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityPeriod::Day => "day",
            ActivityPeriod::Week => "week",
            ActivityPeriod::Month => "month",
            ActivityPeriod::All => "all",
        }
    }
}

/// Per-user action count for an [`ActivityPeriod`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub username: String,
    pub actions: u64,
    pub last_action: Option<DateTime<Utc>>,
}

/// The acting user's session, passed explicitly into every mutation.
#[derive(Debug, Clone)]
pub struct AuthSession {
    user: User,
    role: Role,
    active: bool,
}

impl AuthSession {
    pub fn open(user: User) -> Self {
        let role = Role::parse_lenient(&user.role);
        Self {
            user,
            role,
            active: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Tears the session down. Idempotent.
    pub fn invalidate(&mut self) {
        if self.active {
            self.active = false;
            tracing::info!(user = %self.user.username, "session invalidated");
        }
    }

    /// Boundary hook for store failures: an `Unauthorized` response means
    /// the token is no longer valid, so the session is torn down and the
    /// caller should redirect to login.
    pub fn absorb_store_error(&mut self, err: &StoreError) {
        if matches!(err, StoreError::Unauthorized(_)) {
            self.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        User {
            id: 1,
            username: "dilshod".to_string(),
            role: role.to_string(),
            is_online: true,
            last_seen: None,
        }
    }

    #[test]
    fn session_derives_role_from_profile() {
        let session = AuthSession::open(user("accountant"));
        assert_eq!(session.role(), Role::Accountant);
        assert!(session.is_active());
    }

    #[test]
    fn unknown_role_opens_a_superuser_session() {
        let session = AuthSession::open(user("intern"));
        assert_eq!(session.role(), Role::Superuser);
    }

    #[test]
    fn unauthorized_store_error_invalidates_the_session() {
        let mut session = AuthSession::open(user("operator"));
        session.absorb_store_error(&StoreError::Transport("timeout".to_string()));
        assert!(session.is_active());

        session.absorb_store_error(&StoreError::Unauthorized("token expired".to_string()));
        assert!(!session.is_active());
    }
}
