//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// Every persistence step that can fail has its own variant so the route
/// layer can show a distinct reason for each.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The two supplied password fields do not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Invalid username format.
    #[error("invalid user name: {0}")]
    InvalidUsername(#[from] motorpool_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] motorpool_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Username already registered.
    #[error("user name already taken")]
    UsernameTaken,

    /// No user with the supplied username.
    #[error("unable to find user")]
    UserNotFound,

    /// Password does not match the stored hash.
    #[error("incorrect password")]
    IncorrectPassword,

    /// Password hashing error.
    #[error("there was an error encrypting the password")]
    PasswordHash,

    /// The user record could not be created.
    #[error("there was an error creating the user: {0}")]
    CreateUser(RepositoryError),

    /// The login history could not be persisted.
    #[error("there was an error recording the login: {0}")]
    RecordLogin(RepositoryError),

    /// Any other store failure.
    #[error("user store error: {0}")]
    Repository(#[from] RepositoryError),
}
