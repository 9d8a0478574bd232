//! Car repository for database operations.

use sqlx::PgPool;

use motorpool_core::Vin;

use super::RepositoryError;
use crate::models::{Car, NewCar};

/// Repository for car database operations.
pub struct CarRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CarRepository<'a> {
    /// Create a new car repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new car.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the VIN already exists and
    /// `RepositoryError::Database` for other database errors.
    pub async fn create(&self, car: NewCar) -> Result<Car, RepositoryError> {
        sqlx::query_as::<_, Car>(
            r"
            INSERT INTO cars (vin, make, model, year)
            VALUES ($1, $2, $3, $4)
            RETURNING vin, make, model, year
            ",
        )
        .bind(&car.vin)
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.year)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "a car with vin {} already exists",
                    car.vin
                ));
            }
            RepositoryError::Database(e)
        })
    }

    /// Return every car.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT vin, make, model, year FROM cars ORDER BY vin ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }

    /// Return all cars with the given VIN (zero or one record).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_vin(&self, vin: &Vin) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT vin, make, model, year FROM cars WHERE vin = $1",
        )
        .bind(vin)
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }

    /// Return all cars of the given make (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_make(&self, make: &str) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            r"
            SELECT vin, make, model, year
            FROM cars
            WHERE LOWER(make) = LOWER($1)
            ORDER BY vin ASC
            ",
        )
        .bind(make)
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }

    /// Return all cars of the given model year.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_year(&self, year: i32) -> Result<Vec<Car>, RepositoryError> {
        let cars = sqlx::query_as::<_, Car>(
            r"
            SELECT vin, make, model, year
            FROM cars
            WHERE year = $1
            ORDER BY vin ASC
            ",
        )
        .bind(year)
        .fetch_all(self.pool)
        .await?;

        Ok(cars)
    }

    /// Replace the record identified by `car.vin`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such car exists.
    pub async fn update(&self, car: &Car) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cars
            SET make = $1, model = $2, year = $3
            WHERE vin = $4
            ",
        )
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.year)
        .bind(&car.vin)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove one car by VIN.
    ///
    /// The database nulls the `vin` column of dependent people
    /// (`ON DELETE SET NULL`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matched.
    pub async fn delete_by_vin(&self, vin: &Vin) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cars WHERE vin = $1")
            .bind(vin)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
