//! Flat-file backend tests.
//!
//! Each test runs against a fresh temporary data directory, so the suite
//! needs no external services and leaves nothing behind.

use tempfile::TempDir;

use motorpool_core::{PersonId, StoreId, Vin};
use motorpool_server::db::{Backend, JsonRegistry, RepositoryError};
use motorpool_server::models::{NewCar, NewPerson, NewStore};

/// Create a registry over a fresh tempdir with three empty collections.
async fn open_empty() -> (TempDir, JsonRegistry) {
    let dir = TempDir::new().expect("tempdir");
    for name in ["people.json", "cars.json", "stores.json"] {
        tokio::fs::write(dir.path().join(name), "[]")
            .await
            .expect("seed file");
    }
    let registry = JsonRegistry::open(dir.path()).await.expect("open store");
    (dir, registry)
}

fn vin(s: &str) -> Vin {
    Vin::parse(s).expect("valid vin")
}

fn sample_person(vin_value: Option<&str>) -> NewPerson {
    NewPerson {
        first_name: "Ann".to_owned(),
        last_name: "Fletcher".to_owned(),
        phone: Some("555-0101".to_owned()),
        address: None,
        city: Some("Springfield".to_owned()),
        vin: vin_value.map(vin),
    }
}

fn sample_car(vin_value: &str) -> NewCar {
    NewCar {
        vin: vin(vin_value),
        make: "Ford".to_owned(),
        model: "F150".to_owned(),
        year: 2020,
    }
}

// =============================================================================
// Round-trips
// =============================================================================

#[tokio::test]
async fn test_person_add_get_roundtrip() {
    let (_dir, registry) = open_empty().await;

    let added = registry.add_person(sample_person(None)).await.expect("add");
    let fetched = registry.get_person(added.id).await.expect("get");

    assert_eq!(fetched, added);
    assert_eq!(fetched.phone.as_deref(), Some("555-0101"));
    assert_eq!(fetched.address, None);
}

#[tokio::test]
async fn test_car_add_then_filter_by_vin() {
    let (_dir, registry) = open_empty().await;

    registry.add_car(sample_car("1A")).await.expect("add");

    let cars = registry.get_cars_by_vin(&vin("1A")).await.expect("filter");
    assert_eq!(cars.len(), 1);
    let car = cars.first().expect("one car");
    assert_eq!(car.make, "Ford");
    assert_eq!(car.model, "F150");
    assert_eq!(car.year, 2020);
}

#[tokio::test]
async fn test_store_add_get_roundtrip() {
    let (_dir, registry) = open_empty().await;

    let added = registry
        .add_store(NewStore {
            retailer: "Prairie Auto Supply".to_owned(),
            phone: None,
            address: Some("401 Main Street".to_owned()),
            city: None,
        })
        .await
        .expect("add");

    let fetched = registry.get_store(added.id).await.expect("get");
    assert_eq!(fetched, added);

    let by_retailer = registry
        .get_stores_by_retailer("prairie auto supply")
        .await
        .expect("filter");
    assert_eq!(by_retailer.len(), 1);
}

#[tokio::test]
async fn test_people_filter_by_vin() {
    let (_dir, registry) = open_empty().await;

    registry.add_car(sample_car("1A")).await.expect("add car");
    registry
        .add_person(sample_person(Some("1A")))
        .await
        .expect("add owner");
    registry
        .add_person(sample_person(None))
        .await
        .expect("add other");

    let owners = registry.get_people_by_vin(&vin("1A")).await.expect("filter");
    assert_eq!(owners.len(), 1);
}

// =============================================================================
// Missing keys
// =============================================================================

#[tokio::test]
async fn test_update_with_absent_key_fails_not_found() {
    let (_dir, registry) = open_empty().await;

    let ghost = sample_person(None).into_person(PersonId::new(999));
    assert!(matches!(
        registry.update_person(&ghost).await,
        Err(RepositoryError::NotFound)
    ));

    let ghost_car = motorpool_server::models::Car {
        vin: vin("NOPE1"),
        make: "Ford".to_owned(),
        model: "F150".to_owned(),
        year: 2020,
    };
    assert!(matches!(
        registry.update_car(&ghost_car).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_with_absent_key_fails_not_found() {
    let (_dir, registry) = open_empty().await;

    assert!(matches!(
        registry.delete_person(PersonId::new(999)).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        registry.delete_car_by_vin(&vin("NOPE1")).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        registry.delete_store(StoreId::new(999)).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_get_person_with_absent_key_fails_not_found() {
    let (_dir, registry) = open_empty().await;

    assert!(matches!(
        registry.get_person(PersonId::new(1)).await,
        Err(RepositoryError::NotFound)
    ));
}

// =============================================================================
// Flat-file empty-result policy
// =============================================================================

#[tokio::test]
async fn test_delete_car_then_filter_rejects_no_results() {
    let (_dir, registry) = open_empty().await;

    registry.add_car(sample_car("1A")).await.expect("add");
    registry.add_car(sample_car("2B")).await.expect("add");

    registry.delete_car_by_vin(&vin("1A")).await.expect("delete");

    // The store still holds records, but nothing matches the filter
    assert!(matches!(
        registry.get_cars_by_vin(&vin("1A")).await,
        Err(RepositoryError::NoResults)
    ));
    assert_eq!(registry.get_cars().await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_empty_collections_reject_no_results() {
    let (_dir, registry) = open_empty().await;

    assert!(matches!(
        registry.get_all_people().await,
        Err(RepositoryError::NoResults)
    ));
    assert!(matches!(
        registry.get_cars().await,
        Err(RepositoryError::NoResults)
    ));
    assert!(matches!(
        registry.get_stores().await,
        Err(RepositoryError::NoResults)
    ));
    assert!(matches!(
        registry.get_stores_by_retailer("nobody").await,
        Err(RepositoryError::NoResults)
    ));
}

// =============================================================================
// Duplicate keys
// =============================================================================

#[tokio::test]
async fn test_duplicate_vin_is_a_conflict() {
    let (_dir, registry) = open_empty().await;

    registry.add_car(sample_car("1A")).await.expect("add");
    assert!(matches!(
        registry.add_car(sample_car("1A")).await,
        Err(RepositoryError::Conflict(_))
    ));
}

// =============================================================================
// Car deletion leaves flat-file references untouched
// =============================================================================

#[tokio::test]
async fn test_delete_car_keeps_dependent_person_vin() {
    let (_dir, registry) = open_empty().await;

    registry.add_car(sample_car("1A")).await.expect("add car");
    let owner = registry
        .add_person(sample_person(Some("1A")))
        .await
        .expect("add owner");

    registry.delete_car_by_vin(&vin("1A")).await.expect("delete");

    let fetched = registry.get_person(owner.id).await.expect("get");
    assert_eq!(fetched.vin, Some(vin("1A")));
}
