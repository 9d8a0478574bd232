//! Person repository for database operations.
//!
//! Queries use the runtime sqlx API with `FromRow` models, so the crate
//! builds without a live database.

use sqlx::PgPool;

use motorpool_core::{PersonId, Vin};

use super::RepositoryError;
use crate::models::{NewPerson, Person};

/// Repository for person database operations.
pub struct PersonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PersonRepository<'a> {
    /// Create a new person repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new person.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the VIN references no car
    /// (foreign key violation) and `RepositoryError::Database` for other
    /// database errors.
    pub async fn create(&self, person: NewPerson) -> Result<Person, RepositoryError> {
        sqlx::query_as::<_, Person>(
            r"
            INSERT INTO people (first_name, last_name, phone, address, city, vin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, phone, address, city, vin
            ",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.phone)
        .bind(&person.address)
        .bind(&person.city)
        .bind(&person.vin)
        .fetch_one(self.pool)
        .await
        .map_err(map_person_write_error)
    }

    /// Return every person.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Person>, RepositoryError> {
        let people = sqlx::query_as::<_, Person>(
            r"
            SELECT id, first_name, last_name, phone, address, city, vin
            FROM people
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(people)
    }

    /// Return all people referencing the given VIN.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_vin(&self, vin: &Vin) -> Result<Vec<Person>, RepositoryError> {
        let people = sqlx::query_as::<_, Person>(
            r"
            SELECT id, first_name, last_name, phone, address, city, vin
            FROM people
            WHERE vin = $1
            ORDER BY id ASC
            ",
        )
        .bind(vin)
        .fetch_all(self.pool)
        .await?;

        Ok(people)
    }

    /// Look up one person by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such person exists.
    pub async fn get(&self, id: PersonId) -> Result<Person, RepositoryError> {
        sqlx::query_as::<_, Person>(
            r"
            SELECT id, first_name, last_name, phone, address, city, vin
            FROM people
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Replace the record identified by `person.id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such person exists and
    /// `RepositoryError::Conflict` on a foreign key violation.
    pub async fn update(&self, person: &Person) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE people
            SET first_name = $1, last_name = $2, phone = $3,
                address = $4, city = $5, vin = $6
            WHERE id = $7
            ",
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.phone)
        .bind(&person.address)
        .bind(&person.city)
        .bind(&person.vin)
        .bind(person.id)
        .execute(self.pool)
        .await
        .map_err(map_person_write_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Remove one person by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing matched.
    pub async fn delete(&self, id: PersonId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Map insert/update errors, surfacing a broken car reference as a conflict.
fn map_person_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Conflict("referenced car does not exist".to_owned());
    }
    RepositoryError::Database(e)
}
