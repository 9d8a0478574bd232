//! Integration tests for Motorpool.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p motorpool-integration-tests
//! ```
//!
//! The tests exercise the flat-file backend against a temporary directory
//! and the auth service against [`MemoryUserStore`], so no database or
//! redis instance is needed.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use motorpool_core::Username;
use motorpool_server::db::{RepositoryError, UserStore};
use motorpool_server::models::{LoginEvent, UserRecord};

/// In-memory [`UserStore`] double for auth-service tests.
///
/// Counts every store call so tests can assert that a given code path
/// never reached the store at all.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserRecord>>,
    calls: AtomicUsize,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many store operations have been executed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored users.
    ///
    /// # Panics
    ///
    /// Panics if the inner lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();

        if users.contains_key(user.username.as_str()) {
            return Err(RepositoryError::Conflict(format!(
                "user name {} already taken",
                user.username
            )));
        }

        users.insert(user.username.as_str().to_owned(), user.clone());
        Ok(())
    }

    async fn get(&self, username: &Username) -> Result<Option<UserRecord>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let users = self.users.lock().unwrap();
        Ok(users.get(username.as_str()).cloned())
    }

    async fn update_login_history(
        &self,
        username: &Username,
        history: &[LoginEvent],
    ) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().unwrap();

        let user = users
            .get_mut(username.as_str())
            .ok_or(RepositoryError::NotFound)?;
        user.login_history = history.to_vec();
        Ok(())
    }
}
