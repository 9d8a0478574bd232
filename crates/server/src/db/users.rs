//! User storage for the auth module.
//!
//! Users live in their own document store - a redis hash whose fields are
//! usernames and whose values are whole [`UserRecord`] JSON documents. The
//! connection is established independently of the registry backend, so the
//! auth module works the same whether the registry runs on flat files or
//! `PostgreSQL`.
//!
//! Registration races are arbitrated by the store: `HSETNX` is atomic, so
//! of two simultaneous registrations with the same username exactly one
//! wins and the other observes a conflict.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};

use motorpool_core::Username;

use super::RepositoryError;
use crate::models::{LoginEvent, UserRecord};

/// Redis hash holding all user documents.
const USERS_KEY: &str = "motorpool:users";

/// The contract the auth service stores users through.
///
/// Kept as a trait so tests can substitute an in-memory double; the
/// production implementation is [`RedisUserStore`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user document.
    ///
    /// Fails with `RepositoryError::Conflict` if the username is taken.
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// Fetch a user document by username.
    async fn get(&self, username: &Username) -> Result<Option<UserRecord>, RepositoryError>;

    /// Persist a replacement login history for an existing user.
    ///
    /// Fails with `RepositoryError::NotFound` if the user no longer exists.
    async fn update_login_history(
        &self,
        username: &Username,
        history: &[LoginEvent],
    ) -> Result<(), RepositoryError>;
}

/// Redis-backed user store.
#[derive(Clone)]
pub struct RedisUserStore {
    conn: ConnectionManager,
}

impl RedisUserStore {
    /// Connect to redis and return the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Redis` if the connection cannot be
    /// established.
    pub async fn connect(redis_url: &str) -> Result<Self, RepositoryError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(2)
            .set_connection_timeout(Duration::from_secs(5));

        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager_with_config(config).await?;

        Ok(Self { conn })
    }

    fn encode(user: &UserRecord) -> Result<String, RepositoryError> {
        serde_json::to_string(user).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn create(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        let body = Self::encode(user)?;
        let mut conn = self.conn.clone();

        let created: bool = conn
            .hset_nx(USERS_KEY, user.username.as_str(), body)
            .await?;

        if created {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!(
                "user name {} already taken",
                user.username
            )))
        }
    }

    async fn get(&self, username: &Username) -> Result<Option<UserRecord>, RepositoryError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(USERS_KEY, username.as_str()).await?;

        match raw {
            Some(body) => {
                let user = serde_json::from_str(&body).map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "invalid user document for {username}: {e}"
                    ))
                })?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn update_login_history(
        &self,
        username: &Username,
        history: &[LoginEvent],
    ) -> Result<(), RepositoryError> {
        let mut user = self.get(username).await?.ok_or(RepositoryError::NotFound)?;
        user.login_history = history.to_vec();

        let body = Self::encode(&user)?;
        let mut conn = self.conn.clone();
        let _: () = conn.hset(USERS_KEY, username.as_str(), body).await?;
        Ok(())
    }
}
