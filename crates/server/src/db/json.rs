//! Flat-file JSON store.
//!
//! The teaching-toy variant: all records are read into memory from three
//! JSON files at startup and every mutation rewrites the owning file. A
//! single async `RwLock` owns the collections, so there is no ambient
//! module-level state and writers are serialized within this process.
//!
//! # Persisted layout
//!
//! `people.json`, `cars.json`, `stores.json` under the configured data
//! directory, each an array of objects matching the domain records. Files
//! are replaced via a temp-file-then-rename so a crash mid-write never
//! truncates a collection.
//!
//! # Result policy
//!
//! Unlike the relational store, list and filter operations here FAIL with
//! [`RepositoryError::NoResults`] when they match nothing. Call sites are
//! expected to branch on which behavior occurs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use motorpool_core::{PersonId, StoreId, Vin};

use super::{Backend, RepositoryError};
use crate::models::{Car, NewCar, NewPerson, NewStore, Person, Store};

const PEOPLE_FILE: &str = "people.json";
const CARS_FILE: &str = "cars.json";
const STORES_FILE: &str = "stores.json";

/// In-memory collections plus the next store-assigned IDs.
struct Collections {
    people: Vec<Person>,
    cars: Vec<Car>,
    stores: Vec<Store>,
    next_person_id: i32,
    next_store_id: i32,
}

/// Flat-file registry store.
pub struct JsonRegistry {
    data_dir: PathBuf,
    inner: RwLock<Collections>,
}

impl JsonRegistry {
    /// Open the store by bulk-reading all three collection files.
    ///
    /// All files must exist and parse; a missing or malformed file is a
    /// startup failure, mirroring the rule that the server must not accept
    /// requests against an uninitialized store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if a file cannot be read and
    /// `RepositoryError::DataCorruption` if one does not parse.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let data_dir = data_dir.into();

        let people: Vec<Person> = read_collection(&data_dir, PEOPLE_FILE).await?;
        let cars: Vec<Car> = read_collection(&data_dir, CARS_FILE).await?;
        let stores: Vec<Store> = read_collection(&data_dir, STORES_FILE).await?;

        // IDs are max + 1 rather than len + 1 so deleting a record can
        // never cause an ID to be handed out twice.
        let next_person_id = people.iter().map(|p| p.id.as_i32()).max().unwrap_or(0) + 1;
        let next_store_id = stores.iter().map(|s| s.id.as_i32()).max().unwrap_or(0) + 1;

        tracing::info!(
            people = people.len(),
            cars = cars.len(),
            stores = stores.len(),
            dir = %data_dir.display(),
            "flat-file store loaded"
        );

        Ok(Self {
            data_dir,
            inner: RwLock::new(Collections {
                people,
                cars,
                stores,
                next_person_id,
                next_store_id,
            }),
        })
    }

    async fn persist_people(&self, people: &[Person]) -> Result<(), RepositoryError> {
        write_collection(&self.data_dir, PEOPLE_FILE, people).await
    }

    async fn persist_cars(&self, cars: &[Car]) -> Result<(), RepositoryError> {
        write_collection(&self.data_dir, CARS_FILE, cars).await
    }

    async fn persist_stores(&self, stores: &[Store]) -> Result<(), RepositoryError> {
        write_collection(&self.data_dir, STORES_FILE, stores).await
    }
}

/// Read one collection file into memory.
async fn read_collection<T: DeserializeOwned>(
    dir: &Path,
    name: &str,
) -> Result<Vec<T>, RepositoryError> {
    let path = dir.join(name);
    let raw = tokio::fs::read_to_string(&path).await?;
    serde_json::from_str(&raw).map_err(|e| {
        RepositoryError::DataCorruption(format!("{}: {e}", path.display()))
    })
}

/// Replace one collection file atomically (write to a temp file, rename).
async fn write_collection<T: Serialize>(
    dir: &Path,
    name: &str,
    records: &[T],
) -> Result<(), RepositoryError> {
    let body = serde_json::to_vec_pretty(records)
        .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

    let tmp = dir.join(format!("{name}.tmp"));
    let path = dir.join(name);
    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, &path).await?;
    Ok(())
}

/// Reject empty filter results, per the flat-file policy.
fn non_empty<T>(records: Vec<T>) -> Result<Vec<T>, RepositoryError> {
    if records.is_empty() {
        Err(RepositoryError::NoResults)
    } else {
        Ok(records)
    }
}

#[async_trait]
impl Backend for JsonRegistry {
    // People

    async fn add_person(&self, person: NewPerson) -> Result<Person, RepositoryError> {
        let mut inner = self.inner.write().await;
        let id = PersonId::new(inner.next_person_id);
        inner.next_person_id += 1;

        let person = person.into_person(id);
        inner.people.push(person.clone());
        self.persist_people(&inner.people).await?;
        Ok(person)
    }

    async fn get_all_people(&self) -> Result<Vec<Person>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(inner.people.clone())
    }

    async fn get_people_by_vin(&self, vin: &Vin) -> Result<Vec<Person>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(
            inner
                .people
                .iter()
                .filter(|p| p.vin.as_ref() == Some(vin))
                .cloned()
                .collect(),
        )
    }

    async fn get_person(&self, id: PersonId) -> Result<Person, RepositoryError> {
        let inner = self.inner.read().await;
        inner
            .people
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .people
            .iter_mut()
            .find(|p| p.id == person.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = person.clone();
        self.persist_people(&inner.people).await
    }

    async fn delete_person(&self, id: PersonId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.people.len();
        inner.people.retain(|p| p.id != id);
        if inner.people.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.persist_people(&inner.people).await
    }

    // Cars

    async fn add_car(&self, car: NewCar) -> Result<Car, RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.cars.iter().any(|c| c.vin == car.vin) {
            return Err(RepositoryError::Conflict(format!(
                "a car with vin {} already exists",
                car.vin
            )));
        }

        let car = Car::from(car);
        inner.cars.push(car.clone());
        self.persist_cars(&inner.cars).await?;
        Ok(car)
    }

    async fn get_cars(&self) -> Result<Vec<Car>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(inner.cars.clone())
    }

    async fn get_cars_by_vin(&self, vin: &Vin) -> Result<Vec<Car>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(
            inner
                .cars
                .iter()
                .filter(|c| &c.vin == vin)
                .cloned()
                .collect(),
        )
    }

    async fn get_cars_by_make(&self, make: &str) -> Result<Vec<Car>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(
            inner
                .cars
                .iter()
                .filter(|c| c.make.eq_ignore_ascii_case(make))
                .cloned()
                .collect(),
        )
    }

    async fn get_cars_by_year(&self, year: i32) -> Result<Vec<Car>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(
            inner
                .cars
                .iter()
                .filter(|c| c.year == year)
                .cloned()
                .collect(),
        )
    }

    async fn update_car(&self, car: &Car) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .cars
            .iter_mut()
            .find(|c| c.vin == car.vin)
            .ok_or(RepositoryError::NotFound)?;
        *slot = car.clone();
        self.persist_cars(&inner.cars).await
    }

    async fn delete_car_by_vin(&self, vin: &Vin) -> Result<(), RepositoryError> {
        // Dependent people keep their vin value; in this variant it is an
        // untyped field with no referential integrity.
        let mut inner = self.inner.write().await;
        let before = inner.cars.len();
        inner.cars.retain(|c| &c.vin != vin);
        if inner.cars.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.persist_cars(&inner.cars).await
    }

    // Stores

    async fn add_store(&self, store: NewStore) -> Result<Store, RepositoryError> {
        let mut inner = self.inner.write().await;
        let id = StoreId::new(inner.next_store_id);
        inner.next_store_id += 1;

        let store = store.into_store(id);
        inner.stores.push(store.clone());
        self.persist_stores(&inner.stores).await?;
        Ok(store)
    }

    async fn get_stores(&self) -> Result<Vec<Store>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(inner.stores.clone())
    }

    async fn get_stores_by_retailer(
        &self,
        retailer: &str,
    ) -> Result<Vec<Store>, RepositoryError> {
        let inner = self.inner.read().await;
        non_empty(
            inner
                .stores
                .iter()
                .filter(|s| s.retailer.eq_ignore_ascii_case(retailer))
                .cloned()
                .collect(),
        )
    }

    async fn get_store(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let inner = self.inner.read().await;
        inner
            .stores
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_store(&self, store: &Store) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .stores
            .iter_mut()
            .find(|s| s.id == store.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = store.clone();
        self.persist_stores(&inner.stores).await
    }

    async fn delete_store(&self, id: StoreId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.stores.len();
        inner.stores.retain(|s| s.id != id);
        if inner.stores.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.persist_stores(&inner.stores).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        // Everything is in memory; the store is reachable by definition.
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn empty_store(dir: &Path) -> JsonRegistry {
        for name in [PEOPLE_FILE, CARS_FILE, STORES_FILE] {
            tokio::fs::write(dir.join(name), "[]").await.unwrap();
        }
        JsonRegistry::open(dir).await.unwrap()
    }

    #[tokio::test]
    async fn test_open_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonRegistry::open(dir.path()).await;
        assert!(matches!(result, Err(RepositoryError::Io(_))));
    }

    #[tokio::test]
    async fn test_open_fails_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in [PEOPLE_FILE, CARS_FILE, STORES_FILE] {
            tokio::fs::write(dir.path().join(name), "[]").await.unwrap();
        }
        tokio::fs::write(dir.path().join(CARS_FILE), "{ nope")
            .await
            .unwrap();

        let result = JsonRegistry::open(dir.path()).await;
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(dir.path()).await;

        let new_person = |first: &str| NewPerson {
            first_name: first.to_owned(),
            last_name: "Smith".to_owned(),
            phone: None,
            address: None,
            city: None,
            vin: None,
        };

        let a = store.add_person(new_person("Ann")).await.unwrap();
        let b = store.add_person(new_person("Ben")).await.unwrap();
        store.delete_person(b.id).await.unwrap();
        let c = store.add_person(new_person("Cam")).await.unwrap();

        assert_ne!(c.id, b.id);
        assert!(c.id.as_i32() > b.id.as_i32());
        assert_ne!(c.id, a.id);
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = empty_store(dir.path()).await;
            store
                .add_car(NewCar {
                    vin: Vin::parse("1A").unwrap(),
                    make: "Ford".to_owned(),
                    model: "F150".to_owned(),
                    year: 2020,
                })
                .await
                .unwrap();
        }

        let reopened = JsonRegistry::open(dir.path()).await.unwrap();
        let cars = reopened.get_cars().await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars.first().unwrap().make, "Ford");
    }

    #[tokio::test]
    async fn test_empty_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = empty_store(dir.path()).await;
        assert!(matches!(
            store.get_cars().await,
            Err(RepositoryError::NoResults)
        ));
        assert!(matches!(
            store.get_all_people().await,
            Err(RepositoryError::NoResults)
        ));
    }
}
