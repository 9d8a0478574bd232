//! Authentication service.
//!
//! Wraps the user store with password hashing, verification and
//! login-history tracking. Session handling stays in the route layer; this
//! service only ever sees credentials and records.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use motorpool_core::{Email, Username};

use crate::db::{RepositoryError, UserStore};
use crate::models::{AuthenticatedUser, LoginEvent, UserRecord};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration form data as submitted.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub password2: String,
    pub email: String,
}

/// Login credentials as submitted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Authentication service.
///
/// Borrowed per request; the store behind it is shared application state.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// The password-match precondition is checked before anything else, so
    /// a mismatch never touches the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` if the password fields differ,
    /// `AuthError::InvalidUsername`/`InvalidEmail`/`WeakPassword` on
    /// validation failures, `AuthError::UsernameTaken` if the store reports
    /// a uniqueness conflict and `AuthError::CreateUser` for any other
    /// insert failure.
    pub async fn register(&self, data: Registration) -> Result<(), AuthError> {
        if data.password != data.password2 {
            return Err(AuthError::PasswordMismatch);
        }

        let username = Username::parse(&data.username)?;
        let email = Email::parse(&data.email)?;
        validate_password(&data.password)?;

        let password_hash = hash_password(&data.password)?;

        let record = UserRecord {
            username,
            password_hash,
            email,
            login_history: Vec::new(),
        };

        self.users.create(&record).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UsernameTaken,
            other => AuthError::CreateUser(other),
        })?;

        tracing::info!(username = %record.username, "user registered");
        Ok(())
    }

    /// Authenticate a user and record the login.
    ///
    /// On success, exactly one login-history entry is appended and
    /// persisted, and the returned record carries no password data.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the username is unknown,
    /// `AuthError::IncorrectPassword` on a hash mismatch and
    /// `AuthError::RecordLogin` if the history update cannot be persisted.
    pub async fn login(
        &self,
        credentials: Credentials,
        user_agent: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let username = Username::parse(&credentials.username)?;

        let mut record = self
            .users
            .get(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(&credentials.password, &record.password_hash)?;

        record.login_history.push(LoginEvent {
            date_time: Utc::now(),
            user_agent: user_agent.to_owned(),
        });

        self.users
            .update_login_history(&username, &record.login_history)
            .await
            .map_err(AuthError::RecordLogin)?;

        tracing::info!(username = %record.username, "user logged in");
        Ok(AuthenticatedUser::from(record))
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id with a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::IncorrectPassword)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::IncorrectPassword)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::IncorrectPassword)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }
}
