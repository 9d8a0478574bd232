//! Relational store backed by `PostgreSQL`.
//!
//! One repository per entity over a shared connection pool. Uniqueness of
//! VINs and the people→cars foreign key (with `ON DELETE SET NULL`) are
//! enforced by the database, not by application logic.
//!
//! # Result policy
//!
//! List and filter operations resolve with an empty collection when they
//! match nothing; only by-id lookups, updates and deletes produce
//! [`RepositoryError::NotFound`].
//!
//! # Migrations
//!
//! Schema lives in `crates/server/migrations/` and is applied via:
//! ```bash
//! cargo run -p motorpool-cli -- migrate
//! ```

pub mod cars;
pub mod people;
pub mod stores;

use async_trait::async_trait;
use sqlx::PgPool;

use motorpool_core::{PersonId, StoreId, Vin};

use super::{Backend, RepositoryError};
use crate::models::{Car, NewCar, NewPerson, NewStore, Person, Store};

pub use cars::CarRepository;
pub use people::PersonRepository;
pub use stores::StoreRepository;

/// Relational registry store. Cheap to clone; shares the pool.
#[derive(Clone)]
pub struct PgRegistry {
    pool: PgPool,
}

impl PgRegistry {
    /// Wrap an established connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Backend for PgRegistry {
    async fn add_person(&self, person: NewPerson) -> Result<Person, RepositoryError> {
        PersonRepository::new(&self.pool).create(person).await
    }

    async fn get_all_people(&self) -> Result<Vec<Person>, RepositoryError> {
        PersonRepository::new(&self.pool).list().await
    }

    async fn get_people_by_vin(&self, vin: &Vin) -> Result<Vec<Person>, RepositoryError> {
        PersonRepository::new(&self.pool).list_by_vin(vin).await
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, RepositoryError> {
        PersonRepository::new(&self.pool).get(id).await
    }

    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
        PersonRepository::new(&self.pool).update(person).await
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), RepositoryError> {
        PersonRepository::new(&self.pool).delete(id).await
    }

    async fn add_car(&self, car: NewCar) -> Result<Car, RepositoryError> {
        CarRepository::new(&self.pool).create(car).await
    }

    async fn get_cars(&self) -> Result<Vec<Car>, RepositoryError> {
        CarRepository::new(&self.pool).list().await
    }

    async fn get_cars_by_vin(&self, vin: &Vin) -> Result<Vec<Car>, RepositoryError> {
        CarRepository::new(&self.pool).list_by_vin(vin).await
    }

    async fn get_cars_by_make(&self, make: &str) -> Result<Vec<Car>, RepositoryError> {
        CarRepository::new(&self.pool).list_by_make(make).await
    }

    async fn get_cars_by_year(&self, year: i32) -> Result<Vec<Car>, RepositoryError> {
        CarRepository::new(&self.pool).list_by_year(year).await
    }

    async fn update_car(&self, car: &Car) -> Result<(), RepositoryError> {
        CarRepository::new(&self.pool).update(car).await
    }

    async fn delete_car_by_vin(&self, vin: &Vin) -> Result<(), RepositoryError> {
        CarRepository::new(&self.pool).delete_by_vin(vin).await
    }

    async fn add_store(&self, store: NewStore) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).create(store).await
    }

    async fn get_stores(&self) -> Result<Vec<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).list().await
    }

    async fn get_stores_by_retailer(
        &self,
        retailer: &str,
    ) -> Result<Vec<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).list_by_retailer(retailer).await
    }

    async fn get_store(&self, id: StoreId) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).get(id).await
    }

    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError> {
        StoreRepository::new(&self.pool).update(store).await
    }

    async fn delete_store(&self, id: StoreId) -> Result<(), RepositoryError> {
        StoreRepository::new(&self.pool).delete(id).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
