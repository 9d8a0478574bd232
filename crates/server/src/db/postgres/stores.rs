//! Retail store repository for database operations.

use sqlx::PgPool;

use motorpool_core::StoreId;

use super::RepositoryError;
use crate::models::{NewStore, Store};

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, store: NewStore) -> Result<Store, RepositoryError> {
        let store = sqlx::query_as::<_, Store>(
            r"
            INSERT INTO stores (retailer, phone, address, city)
            VALUES ($1, $2, $3, $4)
            RETURNING id, retailer, phone, address, city
            ",
        )
        .bind(&store.retailer)
        .bind(&store.phone)
        .bind(&store.address)
        .bind(&store.city)
        .fetch_one(self.pool)
        .await?;

        Ok(store)
    }

    /// Return every store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT id, retailer, phone, address, city FROM stores ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }

    /// Return all stores with the given retailer name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_retailer(
        &self,
        retailer: &str,
    ) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>(
            r"
            SELECT id, retailer, phone, address, city
            FROM stores
            WHERE LOWER(retailer) = LOWER($1)
            ORDER BY id ASC
            ",
        )
        .bind(retailer)
        .fetch_all(self.pool)
        .await?;

        Ok(stores)
    }

    /// Look up one store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store exists.
    pub async fn get(&self, id: StoreId) -> Result<Store, RepositoryError> {
        sqlx::query_as::<_, Store>(
            "SELECT id, retailer, phone, address, city FROM stores WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Replace the record identified by `store.id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store exists.
    pub async fn update(&self, store: &Store) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE stores
            SET retailer = $1, phone = $2, address = $3, city = $4
            WHERE id = $5
            ",
        )
        .bind(&store.retailer)
        .bind(&store.phone)
        .bind(&store.address)
        .bind(&store.city)
        .bind(store.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove one store by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matched.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
