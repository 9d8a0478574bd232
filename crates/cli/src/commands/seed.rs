//! Seed command: bulk-load the flat-file JSON data into `PostgreSQL`.
//!
//! Reads the same three collection files the flat-file backend serves
//! (`people.json`, `cars.json`, `stores.json`) and inserts them through the
//! relational backend. Cars are loaded before people so the foreign key on
//! `people.vin` is satisfiable; duplicate primary keys are skipped.

use std::path::Path;

use tracing::{info, warn};

use motorpool_server::db::{self, Backend, PgRegistry, RepositoryError};
use motorpool_server::models::{Car, NewCar, NewPerson, NewStore, Person, Store};

use super::CommandError;

/// Load the JSON data directory into the database.
///
/// # Arguments
///
/// * `data_dir` - Directory holding the three collection files
/// * `truncate` - Delete existing registry rows first
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or if the database
/// rejects an insert for a reason other than a duplicate key.
pub async fn run(data_dir: &str, truncate: bool) -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let dir = Path::new(data_dir);
    let people: Vec<Person> = read_file(dir, "people.json").await?;
    let cars: Vec<Car> = read_file(dir, "cars.json").await?;
    let stores: Vec<Store> = read_file(dir, "stores.json").await?;

    info!(
        people = people.len(),
        cars = cars.len(),
        stores = stores.len(),
        "data files parsed"
    );

    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if truncate {
        info!("Truncating registry tables");
        sqlx::query("TRUNCATE people, cars, stores RESTART IDENTITY")
            .execute(&pool)
            .await?;
    }

    let registry = PgRegistry::new(pool);
    let mut inserted = 0usize;
    let mut skipped = 0usize;

    // Cars first: people may reference them
    for car in cars {
        let new = NewCar {
            vin: car.vin,
            make: car.make,
            model: car.model,
            year: car.year,
        };
        match registry.add_car(new).await {
            Ok(_) => inserted += 1,
            Err(RepositoryError::Conflict(msg)) => {
                warn!("skipping car: {msg}");
                skipped += 1;
            }
            Err(e) => return Err(seed_error(e)),
        }
    }

    for person in people {
        let new = NewPerson {
            first_name: person.first_name,
            last_name: person.last_name,
            phone: person.phone,
            address: person.address,
            city: person.city,
            vin: person.vin,
        };
        match registry.add_person(new).await {
            Ok(_) => inserted += 1,
            Err(RepositoryError::Conflict(msg)) => {
                warn!("skipping person: {msg}");
                skipped += 1;
            }
            Err(e) => return Err(seed_error(e)),
        }
    }

    for store in stores {
        let new = NewStore {
            retailer: store.retailer,
            phone: store.phone,
            address: store.address,
            city: store.city,
        };
        match registry.add_store(new).await {
            Ok(_) => inserted += 1,
            Err(e) => return Err(seed_error(e)),
        }
    }

    info!(inserted, skipped, "Seeding complete!");
    Ok(())
}

async fn read_file<T: serde::de::DeserializeOwned>(
    dir: &Path,
    name: &str,
) -> Result<Vec<T>, CommandError> {
    let path = dir.join(name);
    let raw = tokio::fs::read_to_string(&path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| CommandError::InvalidData(path.display().to_string(), e.to_string()))
}

/// Unwrap the database error behind a repository failure.
fn seed_error(e: RepositoryError) -> CommandError {
    match e {
        RepositoryError::Database(db) => CommandError::Database(db),
        other => CommandError::InvalidData("registry".to_owned(), other.to_string()),
    }
}
