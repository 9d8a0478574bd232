//! The data-access layer: one contract, interchangeable backing stores.
//!
//! # Stores
//!
//! - [`json`] - flat-file store; all records in memory, persisted to three
//!   JSON files (`people.json`, `cars.json`, `stores.json`)
//! - [`postgres`] - relational store; per-entity sqlx repositories
//! - [`users`] - the auth module's user collection in redis, with its own
//!   connection independent of the registry backend
//!
//! Route handlers only ever see the [`Backend`] trait; which store is behind
//! it is decided once, at startup, from configuration.

pub mod json;
pub mod postgres;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use motorpool_core::{PersonId, StoreId, Vin};

use crate::models::{Car, NewCar, NewPerson, NewStore, Person, Store};

pub use json::JsonRegistry;
pub use postgres::PgRegistry;
pub use users::{RedisUserStore, UserStore};

/// Errors that can occur during repository operations.
///
/// The route layer alone decides how each variant maps to an HTTP status
/// and a user-facing message.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Document store error from redis.
    #[error("user store error: {0}")]
    Redis(#[from] redis::RedisError),

    /// File I/O error from the flat-file store.
    #[error("file store error: {0}")]
    Io(#[from] std::io::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate VIN or username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A list or filter operation matched nothing.
    ///
    /// Only the flat-file store produces this; the relational store resolves
    /// the same condition with an empty collection. Call sites handle both.
    #[error("no results returned")]
    NoResults,
}

/// The uniform contract every registry store implements.
///
/// Every operation is asynchronous and returns exactly one of a success
/// value or a [`RepositoryError`]; implementations never panic on bad input
/// and never block the runtime.
#[async_trait]
pub trait Backend: Send + Sync {
    // People

    /// Insert a new person and return the stored record.
    async fn add_person(&self, person: NewPerson) -> Result<Person, RepositoryError>;

    /// Return every person.
    async fn get_all_people(&self) -> Result<Vec<Person>, RepositoryError>;

    /// Return all people referencing the given VIN.
    async fn get_people_by_vin(&self, vin: &Vin) -> Result<Vec<Person>, RepositoryError>;

    /// Look up one person by ID.
    async fn get_person(&self, id: PersonId) -> Result<Person, RepositoryError>;

    /// Replace the record with `person.id` by the given field values.
    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError>;

    /// Remove one person by ID.
    async fn delete_person(&self, id: PersonId) -> Result<(), RepositoryError>;

    // Cars

    /// Insert a new car and return the stored record.
    async fn add_car(&self, car: NewCar) -> Result<Car, RepositoryError>;

    /// Return every car.
    async fn get_cars(&self) -> Result<Vec<Car>, RepositoryError>;

    /// Return all cars with the given VIN (zero or one record).
    async fn get_cars_by_vin(&self, vin: &Vin) -> Result<Vec<Car>, RepositoryError>;

    /// Return all cars of the given make.
    async fn get_cars_by_make(&self, make: &str) -> Result<Vec<Car>, RepositoryError>;

    /// Return all cars of the given model year.
    async fn get_cars_by_year(&self, year: i32) -> Result<Vec<Car>, RepositoryError>;

    /// Replace the record with `car.vin` by the given field values.
    async fn update_car(&self, car: &Car) -> Result<(), RepositoryError>;

    /// Remove one car by VIN.
    async fn delete_car_by_vin(&self, vin: &Vin) -> Result<(), RepositoryError>;

    // Stores

    /// Insert a new store and return the stored record.
    async fn add_store(&self, store: NewStore) -> Result<Store, RepositoryError>;

    /// Return every store.
    async fn get_stores(&self) -> Result<Vec<Store>, RepositoryError>;

    /// Return all stores with the given retailer name.
    async fn get_stores_by_retailer(&self, retailer: &str)
    -> Result<Vec<Store>, RepositoryError>;

    /// Look up one store by ID.
    async fn get_store(&self, id: StoreId) -> Result<Store, RepositoryError>;

    /// Replace the record with `store.id` by the given field values.
    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError>;

    /// Remove one store by ID.
    async fn delete_store(&self, id: StoreId) -> Result<(), RepositoryError>;

    /// Verify the store is reachable; used by the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
