//! User domain types.
//!
//! Users live in the auth module's own document store, not in the registry
//! backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use motorpool_core::{Email, Username};

/// One successful authentication, recorded in order of occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEvent {
    /// When the login happened.
    pub date_time: DateTime<Utc>,
    /// The client's self-reported User-Agent header.
    pub user_agent: String,
}

/// A user document as stored.
///
/// `password_hash` is an argon2 PHC string; the plaintext never touches
/// this type. The record is serialized whole into the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: Username,
    pub password_hash: String,
    pub email: Email,
    /// Appended on every successful authentication, oldest first.
    #[serde(default)]
    pub login_history: Vec<LoginEvent>,
}

/// A user as returned to callers after authentication.
///
/// Deliberately has no password field; sanitization is done by the type
/// system rather than by deleting a field from a map.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub username: Username,
    pub email: Email,
    pub login_history: Vec<LoginEvent>,
}

impl From<UserRecord> for AuthenticatedUser {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            email: record.email,
            login_history: record.login_history,
        }
    }
}
